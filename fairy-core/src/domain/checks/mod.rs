// fairy-core/src/domain/checks/mod.rs
//
// Check dispatch. A check is a pure function over the loaded tables and the
// rule's config; the registry maps declared rule types to those functions.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::report::{ResultMeta, Sample};
use crate::domain::rulepack::{Rule, RuleConfig};
use crate::domain::table::Table;

pub mod config;
pub mod enumeration;
pub mod error;
pub mod foreign_key;
pub mod non_empty;
pub mod pattern;
pub mod range;
pub mod required;
pub mod unique;
pub mod url;

pub use error::CheckError;

/// Tables of a run, keyed by input name.
pub type Tables = BTreeMap<String, Table>;

pub type CheckFn = fn(&CheckInput<'_>) -> Result<Outcome, CheckError>;

/// Everything a check may look at: the rule being evaluated and the tables.
pub struct CheckInput<'a> {
    pub rule: &'a Rule,
    pub tables: &'a Tables,
}

impl<'a> CheckInput<'a> {
    pub fn new(rule: &'a Rule, tables: &'a Tables) -> Self {
        Self { rule, tables }
    }

    pub fn config(&self) -> &'a RuleConfig {
        &self.rule.config
    }

    pub fn hint(&self) -> Option<&'a str> {
        self.rule.hint.as_deref()
    }

    /// Resolves the table a single-table rule targets: `config.input`, or the
    /// only loaded table when exactly one exists.
    pub fn target(&self) -> Result<(&'a str, &'a Table), CheckError> {
        match self.rule.input() {
            Some(name) => self.table(name),
            None if self.tables.len() == 1 => self
                .tables
                .iter()
                .next()
                .map(|(name, table)| (name.as_str(), table))
                .ok_or_else(|| CheckError::InputRequired {
                    available: Vec::new(),
                }),
            None => Err(CheckError::InputRequired {
                available: self.tables.keys().cloned().collect(),
            }),
        }
    }

    pub fn table(&self, name: &str) -> Result<(&'a str, &'a Table), CheckError> {
        self.tables
            .get_key_value(name)
            .map(|(k, t)| (k.as_str(), t))
            .ok_or_else(|| CheckError::UnknownInput {
                input: name.to_string(),
                available: self.tables.keys().cloned().collect(),
            })
    }
}

/// Raw findings of one check: the full violation count, candidate samples
/// (unsorted, untruncated) and diagnostics destined for `RuleResult::meta`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub count: usize,
    pub samples: Vec<Sample>,
    pub meta: ResultMeta,
}

impl Outcome {
    /// Empty outcome whose meta already names the targeted input/column.
    pub fn for_target(input: &str, column: Option<&str>) -> Self {
        let mut meta = ResultMeta::new();
        meta.insert("input".into(), Value::String(input.to_string()));
        if let Some(col) = column {
            meta.insert("column".into(), Value::String(col.to_string()));
        }
        Self {
            count: 0,
            samples: Vec::new(),
            meta,
        }
    }

    /// Records one violation with its witness.
    pub fn push(&mut self, sample: Sample) {
        self.count += 1;
        self.samples.push(sample);
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
}

/// Explicit rule-type -> check table. Built once and passed by reference, so
/// several engines with different rule sets can coexist.
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: BTreeMap<String, CheckFn>,
}

impl CheckRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in check under its canonical name and its aliases.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register("required", required::check)
            .register("schema.required", required::check)
            .register("require_columns", required::check)
            .register("unique", unique::check)
            .register("row.unique", unique::check)
            .register("foreign_key", foreign_key::check)
            .register("range", range::check)
            .register("column.numeric_range", range::check)
            .register("url", url::check)
            .register("column.url", url::check)
            .register("non_empty_trimmed", non_empty::check)
            .register("enum", enumeration::check)
            .register("regex", pattern::check);
        registry
    }

    pub fn register(&mut self, rule_type: &str, check: CheckFn) -> &mut Self {
        self.checks.insert(rule_type.to_string(), check);
        self
    }

    pub fn supports(&self, rule_type: &str) -> bool {
        self.checks.contains_key(rule_type.trim())
    }

    /// Registered type names, sorted.
    pub fn supported_types(&self) -> Vec<String> {
        self.checks.keys().cloned().collect()
    }

    /// Runs the check selected by `rule.rule_type`. Unknown types fail closed;
    /// a panic inside a check is contained and reported as a runtime error.
    pub fn evaluate(&self, rule: &Rule, tables: &Tables) -> Result<Outcome, CheckError> {
        let check = self.checks.get(rule.rule_type.trim()).ok_or_else(|| {
            CheckError::UnsupportedRuleType {
                rule_type: rule.rule_type.clone(),
                supported: self.supported_types(),
            }
        })?;

        let input = CheckInput::new(rule, tables);
        match panic::catch_unwind(AssertUnwindSafe(|| check(&input))) {
            Ok(result) => {
                if let Ok(outcome) = &result {
                    debug!(rule = %rule.id, count = outcome.count, "check evaluated");
                }
                result
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "check panicked".to_string());
                warn!(rule = %rule.id, %message, "check panicked; isolating failure");
                Err(CheckError::Runtime(message))
            }
        }
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("types", &self.checks.keys().collect::<Vec<_>>())
            .finish()
    }
}
