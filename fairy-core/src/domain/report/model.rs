// fairy-core/src/domain/report/model.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::level::Level;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Maximum number of samples retained per rule result.
pub const MAX_SAMPLES: usize = 10;

pub type ResultMeta = BTreeMap<String, Value>;

/// One concrete witness of a rule violation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// 1-based data row; omitted when the finding is not tied to a row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Sample {
    /// Sample for the 0-based row index `row0` of a table.
    pub fn at_row(row0: usize) -> Self {
        Self {
            row: Some(row0 + 1),
            ..Self::default()
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn hint(mut self, hint: Option<&str>) -> Self {
        self.hint = hint.map(str::to_string);
        self
    }

    /// String form of the value used for ordering: strings as-is, other
    /// scalars as their JSON text, absent as "".
    pub fn value_key(&self) -> String {
        match &self.value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Ordering: row ascending with unknown rows first, then column, then value.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| {
                self.column
                    .as_deref()
                    .unwrap_or("")
                    .cmp(other.column.as_deref().unwrap_or(""))
            })
            .then_with(|| self.value_key().cmp(&other.value_key()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule: String,
    pub level: Level,
    pub count: usize,
    #[serde(default)]
    pub samples: Vec<Sample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResultMeta>,
}

impl RuleResult {
    fn meta_str(&self, key: &str) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn input(&self) -> &str {
        self.meta_str("input")
    }

    pub fn column(&self) -> &str {
        self.meta_str("column")
    }

    /// Report ordering: (input, column, rule id, level name).
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        self.input()
            .cmp(other.input())
            .then_with(|| self.column().cmp(other.column()))
            .then_with(|| self.rule.cmp(&other.rule))
            .then_with(|| self.level.as_str().cmp(other.level.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelCounts {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
}

impl LevelCounts {
    pub fn record(&mut self, level: Level) {
        match level {
            Level::Pass => self.pass += 1,
            Level::Warn => self.warn += 1,
            Level::Fail => self.fail += 1,
        }
    }

    pub fn get(&self, level: Level) -> usize {
        match level {
            Level::Pass => self.pass,
            Level::Warn => self.warn,
            Level::Fail => self.fail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub by_level: LevelCounts,
    pub by_rule: BTreeMap<String, Level>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMetadata {
    pub path: String,
    pub sha256: String,
    pub n_rows: usize,
    pub n_cols: usize,
    pub header: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulepackMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub sha256: String,
    pub id: String,
    pub version: String,
    pub params_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub inputs: BTreeMap<String, InputMetadata>,
    pub rulepack: RulepackMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub fairy_core_version: String,
}

/// Which rulepack, by name and location, produced the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub rulepack_name: String,
    pub rulepack_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rulepack_source_path: Option<String>,
}

/// The v1 report. Built once by the assembler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportV1 {
    schema_version: String,
    generated_at: String,
    dataset_id: String,
    metadata: Metadata,
    summary: Summary,
    results: Vec<RuleResult>,
    engine: EngineInfo,
    attestation: Attestation,
}

impl ReportV1 {
    pub(crate) fn new(
        generated_at: String,
        dataset_id: String,
        metadata: Metadata,
        summary: Summary,
        results: Vec<RuleResult>,
        engine: EngineInfo,
        attestation: Attestation,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at,
            dataset_id,
            metadata,
            summary,
            results,
            engine,
            attestation,
        }
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn results(&self) -> &[RuleResult] {
        &self.results
    }

    pub fn engine(&self) -> &EngineInfo {
        &self.engine
    }

    pub fn attestation(&self) -> &Attestation {
        &self.attestation
    }

    pub fn result(&self, rule_id: &str) -> Option<&RuleResult> {
        self.results.iter().find(|r| r.rule == rule_id)
    }

    /// Ready for submission when no fail-level result exists.
    pub fn submission_ready(&self) -> bool {
        self.summary.by_level.fail == 0
    }

    /// Sorted ids of rules whose level is `level`.
    pub fn rules_at(&self, level: Level) -> Vec<&str> {
        self.summary
            .by_rule
            .iter()
            .filter(|(_, l)| **l == level)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_row_sorts_first() {
        let a = Sample::default().column("x");
        let b = Sample::at_row(0).column("a");
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
    }

    #[test]
    fn test_value_key_uses_raw_string() {
        let s = Sample::at_row(0).value("10");
        assert_eq!(s.value_key(), "10");
        let n = Sample::at_row(0).value(json!(10));
        assert_eq!(n.value_key(), "10");
        assert_eq!(Sample::default().value_key(), "");
    }

    #[test]
    fn test_sample_serialization_omits_unknown_fields() -> anyhow::Result<()> {
        let s = Sample::default().message("Required column 'x' is missing.");
        let v = serde_json::to_value(&s)?;
        assert_eq!(v, json!({"message": "Required column 'x' is missing."}));
        Ok(())
    }

    #[test]
    fn test_result_ordering_uses_meta_then_rule() {
        let mk = |rule: &str, input: Option<&str>| RuleResult {
            rule: rule.into(),
            level: Level::Pass,
            count: 0,
            samples: vec![],
            meta: input.map(|i| {
                let mut m = ResultMeta::new();
                m.insert("input".into(), json!(i));
                m
            }),
        };
        let no_meta = mk("z", None);
        let samples = mk("a", Some("samples"));
        assert_eq!(no_meta.sort_cmp(&samples), Ordering::Less);
        assert_eq!(mk("a", Some("files")).sort_cmp(&samples), Ordering::Less);
    }
}
