// fairy-core/src/domain/checks/pattern.rs

use regex::Regex;

use super::config::{bool_or, opt_str, req_str};
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;
use crate::domain::table::is_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Violation when the value does not match the whole pattern.
    NotMatches,
    /// Violation when the value contains a match.
    Matches,
}

impl Mode {
    fn parse(raw: Option<&str>) -> Result<Self, CheckError> {
        match raw.map(str::trim) {
            None | Some("not_matches") => Ok(Self::NotMatches),
            Some("matches") => Ok(Self::Matches),
            Some(other) => Err(CheckError::InvalidConfig {
                key: "mode".into(),
                reason: format!("unknown mode '{}', expected matches or not_matches", other),
            }),
        }
    }
}

pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let config = input.config();
    let column = req_str(config, "column")?;
    let pattern = req_str(config, "pattern")?;
    let mode = Mode::parse(opt_str(config, "mode")?)?;
    let ignore_empty = bool_or(config, "ignore_empty", true)?;

    let source = match mode {
        Mode::NotMatches => format!("^(?:{})$", pattern),
        Mode::Matches => pattern.to_string(),
    };
    let re = Regex::new(&source).map_err(|source| CheckError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let (name, table) = input.target()?;
    let cells = table
        .column(column)
        .ok_or_else(|| CheckError::missing_column(name, column))?;

    let mut outcome = Outcome::for_target(name, Some(column));
    for (row, cell) in cells.enumerate() {
        if ignore_empty && is_blank(cell) {
            continue;
        }
        let violates = match mode {
            Mode::NotMatches => !re.is_match(cell),
            Mode::Matches => re.is_match(cell),
        };
        if !violates {
            continue;
        }
        let message = match mode {
            Mode::NotMatches => format!("Value '{}' does not match /{}/.", cell, pattern),
            Mode::Matches => format!("Value '{}' matches forbidden /{}/.", cell, pattern),
        };
        outcome.push(
            Sample::at_row(row)
                .column(column)
                .value(cell)
                .message(message)
                .hint(input.hint()),
        );
    }
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::Tables;
    use crate::domain::rulepack::{Rule, Severity};
    use crate::domain::table::Table;

    fn tables() -> Tables {
        let mut t = Tables::new();
        t.insert(
            "samples".into(),
            Table::from_rows(
                ["sample_id"],
                vec![vec!["S001"], vec!["S2x"], vec![""], vec!["S 003"]],
            ),
        );
        t
    }

    #[test]
    fn test_not_matches_requires_full_match() {
        let t = tables();
        let rule = Rule::new("p", "regex", Severity::Fail)
            .with("column", "sample_id")
            .with("pattern", r"S\d+");
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        let rows: Vec<_> = out.samples.iter().filter_map(|s| s.row).collect();
        assert_eq!(rows, vec![2, 4]);
    }

    #[test]
    fn test_matches_mode_flags_forbidden_content() {
        let t = tables();
        let rule = Rule::new("p", "regex", Severity::Warn)
            .with("column", "sample_id")
            .with("pattern", r"\s")
            .with("mode", "matches");
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 1);
        assert_eq!(out.samples[0].row, Some(4));
    }

    #[test]
    fn test_empty_cells_checked_when_not_ignored() {
        let t = tables();
        let rule = Rule::new("p", "regex", Severity::Fail)
            .with("column", "sample_id")
            .with("pattern", r"S\d+")
            .with("ignore_empty", false);
        assert_eq!(check(&CheckInput::new(&rule, &t)).unwrap().count, 3);
    }

    #[test]
    fn test_invalid_pattern() {
        let t = tables();
        let rule = Rule::new("p", "regex", Severity::Fail)
            .with("column", "sample_id")
            .with("pattern", "(");
        assert!(matches!(
            check(&CheckInput::new(&rule, &t)),
            Err(CheckError::InvalidPattern { .. })
        ));
    }
}
