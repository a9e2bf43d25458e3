// fairy-core/src/domain/checks/foreign_key.rs

use std::collections::HashSet;

use serde_json::Value;

use super::config::req_str;
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;
use crate::domain::rulepack::RuleConfig;
use crate::domain::table::is_blank;

/// One side of a foreign-key relation: a column of a named input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub input: String,
    pub field: String,
}

impl Endpoint {
    fn from_config(config: &RuleConfig, key: &str) -> Result<Self, CheckError> {
        let side = match config.get(key) {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(CheckError::InvalidConfig {
                    key: key.to_string(),
                    reason: "expected a mapping with `input` and `field`".into(),
                });
            }
            None => return Err(CheckError::MissingConfig(key.to_string())),
        };
        let qualified = |sub: &str| format!("{}.{}", key, sub);
        let input = req_str(side, "input").map_err(|_| CheckError::MissingConfig(qualified("input")))?;
        let field = req_str(side, "field").map_err(|_| CheckError::MissingConfig(qualified("field")))?;
        Ok(Self {
            input: input.to_string(),
            field: field.to_string(),
        })
    }
}

/// Every non-blank `from` value must occur in the `to` column. Blank `from`
/// cells are not references and never violate.
pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let from = Endpoint::from_config(input.config(), "from")?;
    let to = Endpoint::from_config(input.config(), "to")?;

    let (from_name, from_table) = input.table(&from.input)?;
    let (to_name, to_table) = input.table(&to.input)?;

    let from_cells = from_table
        .column(&from.field)
        .ok_or_else(|| CheckError::missing_column(from_name, &from.field))?;
    let known: HashSet<&str> = to_table
        .column(&to.field)
        .ok_or_else(|| CheckError::missing_column(to_name, &to.field))?
        .filter(|c| !is_blank(c))
        .map(str::trim)
        .collect();

    let mut outcome = Outcome::for_target(from_name, Some(&from.field))
        .with_meta("to", format!("{}.{}", to_name, to.field));

    for (row, value) in from_cells.enumerate() {
        if is_blank(value) || known.contains(value.trim()) {
            continue;
        }
        outcome.push(
            Sample::at_row(row)
                .column(from.field.as_str())
                .value(value)
                .message(format!(
                    "Value '{}' in {}.{} has no match in {}.{}.",
                    value, from_name, from.field, to_name, to.field
                ))
                .hint(input.hint()),
        );
    }
    Ok(outcome)
}
