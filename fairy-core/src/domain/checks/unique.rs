// fairy-core/src/domain/checks/unique.rs

use std::collections::BTreeMap;

use serde_json::Value;

use super::config::{bool_or, columns};
use super::{CheckError, CheckInput, Outcome};
use crate::domain::report::Sample;
use crate::domain::table::{Table, is_blank};

#[derive(Debug, Clone, Copy)]
pub struct UniqueOptions {
    pub casefold: bool,
    pub ignore_empty: bool,
}

impl Default for UniqueOptions {
    fn default() -> Self {
        Self {
            casefold: false,
            ignore_empty: true,
        }
    }
}

pub fn check(input: &CheckInput<'_>) -> Result<Outcome, CheckError> {
    let config = input.config();
    let cols = columns(config, &["columns"])?;
    let options = UniqueOptions {
        casefold: bool_or(config, "casefold", false)?,
        ignore_empty: bool_or(config, "ignore_empty", true)?,
    };
    let (name, table) = input.target()?;

    let mut indices = Vec::with_capacity(cols.len());
    for col in &cols {
        let idx = table
            .column_index(col)
            .ok_or_else(|| CheckError::missing_column(name, col))?;
        indices.push(idx);
    }

    let label = cols.join("+");
    let outcome = Outcome::for_target(name, Some(&label));
    Ok(find_duplicates(outcome, table, &indices, &label, options))
}

/// Groups rows by key; every member of a group of size >= 2 counts towards
/// the violation count, while only the last two rows of each group are
/// sampled.
pub fn find_duplicates(
    mut outcome: Outcome,
    table: &Table,
    indices: &[usize],
    label: &str,
    options: UniqueOptions,
) -> Outcome {
    let mut groups: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();

    for (row, cells) in table.rows().enumerate() {
        let key: Vec<&str> = indices.iter().map(|&i| cells[i].as_str()).collect();
        if options.ignore_empty && key.iter().all(|c| is_blank(c)) {
            continue;
        }
        let key = key
            .into_iter()
            .map(|c| {
                if options.casefold {
                    c.to_lowercase()
                } else {
                    c.to_string()
                }
            })
            .collect();
        groups.entry(key).or_default().push(row);
    }

    for rows in groups.values().filter(|rows| rows.len() >= 2) {
        outcome.count += rows.len();
        for &row in rows.iter().rev().take(2).rev() {
            let value = indices
                .iter()
                .map(|&i| table.row(row).map(|r| r[i].clone()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("|");
            outcome.samples.push(
                Sample::at_row(row)
                    .column(label)
                    .value(Value::String(value.clone()))
                    .message(format!("Duplicate {} value '{}'.", label, value)),
            );
        }
    }

    let groups_with_dups = groups.values().filter(|r| r.len() >= 2).count();
    outcome.with_meta("duplicate_groups", groups_with_dups)
}
