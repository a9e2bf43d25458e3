// fairy-core/src/domain/checks/range.rs

use super::config::{bool_or, opt_f64, req_str};
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;
use crate::domain::table::is_blank;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub inclusive: bool,
}

impl Bounds {
    pub fn contains(&self, v: f64) -> bool {
        let above_min = self
            .min
            .is_none_or(|min| if self.inclusive { v >= min } else { v > min });
        let below_max = self
            .max
            .is_none_or(|max| if self.inclusive { v <= max } else { v < max });
        above_min && below_max
    }

    fn describe(&self) -> String {
        let (open, close) = if self.inclusive { ('[', ']') } else { ('(', ')') };
        let fmt = |b: Option<f64>, inf: &str| b.map_or_else(|| inf.to_string(), |v| v.to_string());
        format!("{}{}, {}{}", open, fmt(self.min, "-inf"), fmt(self.max, "+inf"), close)
    }
}

/// Parses a cell as a finite number. `NaN` and infinities are not numbers
/// for the purpose of a range check.
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let config = input.config();
    let column = req_str(config, "column")?;
    let bounds = Bounds {
        min: opt_f64(config, "min")?,
        max: opt_f64(config, "max")?,
        inclusive: bool_or(config, "inclusive", true)?,
    };
    if let (Some(min), Some(max)) = (bounds.min, bounds.max) {
        if min > max {
            return Err(CheckError::InvalidConfig {
                key: "min".into(),
                reason: format!("min ({}) is greater than max ({})", min, max),
            });
        }
    }

    let (name, table) = input.target()?;
    let cells = table
        .column(column)
        .ok_or_else(|| CheckError::missing_column(name, column))?;

    let mut outcome = Outcome::for_target(name, Some(column));
    let mut non_numeric = 0usize;

    for (row, cell) in cells.enumerate() {
        if is_blank(cell) {
            continue;
        }
        let message = match parse_number(cell) {
            Some(v) if bounds.contains(v) => continue,
            Some(v) => format!("Value {} is outside {}.", v, bounds.describe()),
            None => {
                non_numeric += 1;
                format!("Value '{}' is not numeric.", cell)
            }
        };
        outcome.push(
            Sample::at_row(row)
                .column(column)
                .value(cell)
                .message(message)
                .hint(input.hint()),
        );
    }

    Ok(outcome.with_meta("non_numeric_count", non_numeric))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::Tables;
    use crate::domain::rulepack::{Rule, Severity};
    use crate::domain::table::Table;
    use serde_json::json;

    fn tables(values: &[&str]) -> Tables {
        let mut t = Tables::new();
        t.insert(
            "samples".into(),
            Table::from_rows(["reads"], values.iter().map(|v| vec![*v]).collect::<Vec<_>>()),
        );
        t
    }

    #[test]
    fn test_out_of_bounds_and_non_numeric() {
        let t = tables(&["-1", "oops", "0", "5", "10"]);
        let rule = Rule::new("r", "range", Severity::Fail)
            .with("column", "reads")
            .with("min", 0)
            .with("max", 9);
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 3);
        let rows: Vec<_> = out.samples.iter().filter_map(|s| s.row).collect();
        assert_eq!(rows, vec![1, 2, 5]);
        assert_eq!(out.meta["non_numeric_count"], json!(1));
    }

    #[test]
    fn test_blank_is_skipped_and_nan_is_non_numeric() {
        let t = tables(&["", "NaN", "inf"]);
        let rule = Rule::new("r", "column.numeric_range", Severity::Warn)
            .with("column", "reads")
            .with("min", 0);
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 2);
        assert_eq!(out.meta["non_numeric_count"], json!(2));
    }

    #[test]
    fn test_exclusive_bounds() {
        let b = Bounds {
            min: Some(0.0),
            max: Some(1.0),
            inclusive: false,
        };
        assert!(!b.contains(0.0));
        assert!(b.contains(0.5));
        assert!(!b.contains(1.0));
        assert_eq!(b.describe(), "(0, 1)");
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let t = tables(&["1"]);
        let rule = Rule::new("r", "range", Severity::Fail)
            .with("column", "reads")
            .with("min", 5)
            .with("max", 1);
        assert!(matches!(
            check(&CheckInput::new(&rule, &t)),
            Err(CheckError::InvalidConfig { .. })
        ));
    }
}
