// fairy-core/src/domain/checks/enumeration.rs

use std::collections::BTreeSet;

use super::config::{bool_or, opt_str_list, req_str};
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;
use crate::domain::table::is_blank;

#[derive(Debug, Clone, Copy, Default)]
struct Normalize {
    casefold: bool,
    trim: bool,
}

impl Normalize {
    fn apply(&self, value: &str) -> String {
        let v = if self.trim { value.trim() } else { value };
        if self.casefold {
            v.to_lowercase()
        } else {
            v.to_string()
        }
    }
}

pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let config = input.config();
    let column = req_str(config, "column")?;
    let norm = Normalize {
        casefold: bool_or(config, "casefold", false)?,
        trim: bool_or(config, "trim", false)?,
    };
    let allow = opt_str_list(config, "allow")?.ok_or_else(|| CheckError::MissingConfig("allow".into()))?;
    if allow.is_empty() {
        return Err(CheckError::InvalidConfig {
            key: "allow".into(),
            reason: "must list at least one value".into(),
        });
    }
    let allowed: BTreeSet<String> = allow.iter().map(|v| norm.apply(v)).collect();

    let (name, table) = input.target()?;
    let cells = table
        .column(column)
        .ok_or_else(|| CheckError::missing_column(name, column))?;

    let mut outcome = Outcome::for_target(name, Some(column));
    for (row, cell) in cells.enumerate() {
        if is_blank(cell) || allowed.contains(&norm.apply(cell)) {
            continue;
        }
        outcome.push(
            Sample::at_row(row)
                .column(column)
                .value(cell)
                .message(format!(
                    "Value '{}' is not one of: {}.",
                    cell,
                    allow.join(", ")
                ))
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
    use serde_json::json;

    fn tables() -> Tables {
        let mut t = Tables::new();
        t.insert(
            "files".into(),
            Table::from_rows(
                ["layout"],
                vec![vec!["PAIRED"], vec!["single "], vec![""], vec!["triple"]],
            ),
        );
        t
    }

    #[test]
    fn test_exact_match_by_default() {
        let t = tables();
        let rule = Rule::new("e", "enum", Severity::Fail)
            .with("column", "layout")
            .with("allow", json!(["PAIRED", "SINGLE"]));
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 2);
    }

    #[test]
    fn test_casefold_and_trim() {
        let t = tables();
        let rule = Rule::new("e", "enum", Severity::Fail)
            .with("column", "layout")
            .with("allow", json!(["PAIRED", "SINGLE"]))
            .with("casefold", true)
            .with("trim", true);
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 1);
        assert_eq!(out.samples[0].value, Some(json!("triple")));
    }

    #[test]
    fn test_allow_is_required() {
        let t = tables();
        let rule = Rule::new("e", "enum", Severity::Fail).with("column", "layout");
        assert!(matches!(
            check(&CheckInput::new(&rule, &t)),
            Err(CheckError::MissingConfig(k)) if k == "allow"
        ));
    }
}
