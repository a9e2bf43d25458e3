// fairy-core/src/domain/checks/required.rs

use super::config::columns;
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;
use crate::domain::table::{Table, is_blank};

pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let cols = columns(input.config(), &["columns", "required_columns"])?;
    let (name, table) = input.target()?;
    let single = (cols.len() == 1).then(|| cols[0].as_str());

    Ok(missing_required(
        Outcome::for_target(name, single),
        table,
        &cols,
        input.hint(),
    ))
}

/// A missing column is one finding without a row; a present column yields
/// one finding per blank cell.
pub fn missing_required(
    mut outcome: Outcome,
    table: &Table,
    cols: &[String],
    hint: Option<&str>,
) -> Outcome {
    for col in cols {
        let Some(cells) = table.column(col) else {
            outcome.push(
                Sample::default()
                    .column(col.as_str())
                    .message(format!("Required column '{}' is missing.", col))
                    .hint(hint.or(Some("Add this column before export."))),
            );
            continue;
        };
        for (row, _) in cells.enumerate().filter(|(_, c)| is_blank(c)) {
            outcome.push(
                Sample::at_row(row)
                    .column(col.as_str())
                    .message(format!("Missing value in required field '{}'.", col))
                    .hint(hint.or(Some("Fill this cell."))),
            );
        }
    }
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::Tables;
    use crate::domain::rulepack::{Rule, Severity};
    use serde_json::json;

    fn tables() -> Tables {
        let mut t = Tables::new();
        t.insert(
            "samples".into(),
            Table::from_rows(
                ["sample_id", "organism"],
                vec![vec!["S1", "human"], vec!["S2", "  "], vec!["", "mouse"]],
            ),
        );
        t
    }

    #[test]
    fn test_blank_cells_are_findings() {
        let t = tables();
        let rule = Rule::new("r", "required", Severity::Fail)
            .with("columns", json!(["sample_id", "organism"]));
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 2);
        let rows: Vec<_> = out.samples.iter().map(|s| s.row).collect();
        assert_eq!(rows, vec![Some(3), Some(2)]);
    }

    #[test]
    fn test_missing_column_has_no_row() {
        let t = tables();
        let rule = Rule::new("r", "require_columns", Severity::Warn)
            .with("required_columns", json!(["tissue"]));
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.count, 1);
        assert_eq!(out.samples[0].row, None);
        assert_eq!(out.samples[0].column.as_deref(), Some("tissue"));
        assert_eq!(out.meta["column"], json!("tissue"));
    }

    #[test]
    fn test_rule_hint_overrides_default() {
        let t = tables();
        let mut rule = Rule::new("r", "required", Severity::Fail).with("column", "sample_id");
        rule.hint = Some("Every sample needs an id.".into());
        let out = check(&CheckInput::new(&rule, &t)).unwrap();
        assert_eq!(out.samples[0].hint.as_deref(), Some("Every sample needs an id."));
    }

    #[test]
    fn test_no_columns_configured() {
        let t = tables();
        let rule = Rule::new("r", "required", Severity::Fail);
        assert!(matches!(
            check(&CheckInput::new(&rule, &t)),
            Err(CheckError::MissingConfig(_))
        ));
    }
}
