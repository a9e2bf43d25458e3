// fairy-core/src/domain/checks/non_empty.rs

use super::config::{opt_str_list, req_str};
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;

const DEFAULT_NA_VALUES: [&str; 5] = ["NA", "N/A", "NaN", "null", "None"];

pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let config = input.config();
    let column = req_str(config, "column")?;
    let na_values: Vec<String> = opt_str_list(config, "na_values")?
        .unwrap_or_else(|| DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect())
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let (name, table) = input.target()?;
    let cells = table
        .column(column)
        .ok_or_else(|| CheckError::missing_column(name, column))?;

    let mut outcome = Outcome::for_target(name, Some(column));
    for (row, cell) in cells.enumerate() {
        let trimmed = cell.trim();
        let message = if trimmed.is_empty() {
            format!("Value in '{}' is empty.", column)
        } else if na_values.contains(&trimmed.to_lowercase()) {
            format!("Value '{}' in '{}' is a missing-value placeholder.", trimmed, column)
        } else {
            continue;
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
    use serde_json::json;

    fn tables() -> Tables {
        let mut t = Tables::new();
        t.insert(
            "samples".into(),
            Table::from_rows(
                ["organism"],
                vec![vec!["human"], vec!["  "], vec!["n/a"], vec!["none "], vec!["NAN"]],
            ),
        );
        t
    }

    #[test]
    fn test_blank_and_na_tokens() {
        let t = tables();
        let rule = Rule::new("n", "non_empty_trimmed", Severity::Fail).with("column", "organism");
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 4);
        assert_eq!(out.samples[0].row, Some(2));
    }

    #[test]
    fn test_custom_na_values() {
        let t = tables();
        let rule = Rule::new("n", "non_empty_trimmed", Severity::Fail)
            .with("column", "organism")
            .with("na_values", json!(["unknown"]));
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 1);
    }
}
