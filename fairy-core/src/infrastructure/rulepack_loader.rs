// fairy-core/src/infrastructure/rulepack_loader.rs
//
// Reads a rulepack file (YAML, or JSON as a YAML subset), checks its shape
// and turns it into a validated domain `Rulepack`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use crate::domain::rulepack::{Params, Rule, Rulepack, RulepackIdentity, Severity};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::hashing::hash_file;

// --- FILE SHAPE ---

#[derive(Debug, Deserialize, Validate)]
struct RulepackDoc {
    #[validate(nested)]
    meta: MetaDoc,

    #[validate(
        length(min = 1, message = "a rulepack needs at least one rule"),
        nested,
        custom(function = "unique_rule_ids")
    )]
    rules: Vec<RuleDoc>,

    #[serde(default)]
    params: Option<Params>,
}

#[derive(Debug, Deserialize, Validate)]
struct MetaDoc {
    #[serde(default, deserialize_with = "opt_scalar_string")]
    id: Option<String>,

    #[validate(length(min = 1, message = "meta.name must not be empty"))]
    #[serde(deserialize_with = "scalar_string")]
    name: String,

    #[validate(length(min = 1, message = "meta.version must not be empty"))]
    #[serde(deserialize_with = "scalar_string")]
    version: String,

    #[serde(default)]
    description: Option<String>,
}

// validator serializes `rules` into the length error, so RuleDoc must be Serialize
#[derive(Debug, Serialize, Deserialize, Validate)]
struct RuleDoc {
    #[validate(length(min = 1, message = "rule id must not be empty"))]
    #[serde(deserialize_with = "scalar_string")]
    id: String,

    #[validate(length(min = 1, message = "rule type must not be empty"))]
    #[serde(rename = "type")]
    rule_type: String,

    #[serde(default)]
    severity: Severity,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    hint: Option<String>,

    #[serde(default)]
    config: Map<String, Value>,

    /// Any other key is check configuration written inline on the rule.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RuleDoc {
    fn into_rule(self) -> Rule {
        let mut config = self.config;
        for (key, value) in self.extra {
            config.entry(key).or_insert(value);
        }
        Rule {
            id: self.id,
            rule_type: self.rule_type,
            severity: self.severity,
            config,
            description: self.description,
            hint: self.hint,
        }
    }
}

fn unique_rule_ids(rules: &[RuleDoc]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.id.as_str()) {
            let mut err = ValidationError::new("duplicate_rule_id");
            err.message = Some(format!("duplicate rule id '{}'", rule.id).into());
            return Err(err);
        }
    }
    Ok(())
}

/// Versions and ids are often written unquoted (`version: 1.0`); accept any scalar.
fn scalar_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {}",
            other
        ))),
    }
}

fn opt_scalar_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {}",
            other
        ))),
    }
}

// --- LOADER ---

/// Loads, validates and hashes a rulepack file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_rulepack(path: &Path) -> Result<Rulepack, InfrastructureError> {
    if !path.is_file() {
        return Err(InfrastructureError::RulepackNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let rulepack = parse_rulepack(&content, path)?;
    let sha256 = hash_file(path)?;

    let (doc_meta, rules, params) = rulepack;
    let identity = RulepackIdentity {
        id: doc_meta.id.unwrap_or_else(|| doc_meta.name.clone()),
        version: doc_meta.version,
        sha256,
    };

    let invalid = |reason: String| InfrastructureError::RulepackInvalid {
        path: path.to_path_buf(),
        reason,
    };
    let rulepack = Rulepack::new(identity, rules, params)
        .map_err(|e| invalid(e.to_string()))?
        .with_name(doc_meta.name)
        .with_description(doc_meta.description)
        .with_source_path(path.display().to_string());

    info!(
        id = rulepack.id(),
        version = rulepack.version(),
        rules = rulepack.rules().len(),
        "Rulepack loaded"
    );
    Ok(rulepack)
}

type ParsedRulepack = (MetaDoc, Vec<Rule>, Params);

fn parse_rulepack(content: &str, path: &Path) -> Result<ParsedRulepack, InfrastructureError> {
    let parse_err = |reason: String| InfrastructureError::RulepackParse {
        path: path.to_path_buf(),
        reason,
    };
    let invalid = |reason: String| InfrastructureError::RulepackInvalid {
        path: path.to_path_buf(),
        reason,
    };

    let raw: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?;
    if !raw.is_mapping() {
        return Err(invalid("top level must be a mapping".into()));
    }

    let doc: RulepackDoc = serde_yaml::from_value(raw).map_err(|e| invalid(e.to_string()))?;
    doc.validate().map_err(|e| invalid(e.to_string()))?;

    let rules = doc.rules.into_iter().map(RuleDoc::into_rule).collect();
    Ok((doc.meta, rules, doc.params.unwrap_or_default()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    const GOOD: &str = r#"
meta:
  name: GEO-SEQ-BULK
  version: 0.1
  description: Bulk RNA-seq submission checks
rules:
  - id: samples.required
    type: required
    severity: fail
    config: { input: samples, columns: [sample_id, organism] }
  - id: samples.layout
    type: enum
    severity: warning
    input: files
    column: layout
    allow: [PAIRED, SINGLE]
params:
  min_reads: 1000
"#;

    fn write(content: &str) -> Result<(tempfile::TempDir, std::path::PathBuf)> {
        let dir = tempdir()?;
        let path = dir.path().join("rulepack.yaml");
        fs::write(&path, content)?;
        Ok((dir, path))
    }

    #[test]
    fn test_loads_and_merges_inline_config() -> Result<()> {
        let (_dir, path) = write(GOOD)?;
        let rp = load_rulepack(&path)?;

        assert_eq!(rp.id(), "GEO-SEQ-BULK");
        assert_eq!(rp.version(), "0.1");
        assert_eq!(rp.identity().sha256.len(), 64);
        assert_eq!(rp.rules().len(), 2);

        let layout = &rp.rules()[1];
        assert_eq!(layout.severity, Severity::Warn);
        assert_eq!(layout.input(), Some("files"));
        assert_eq!(layout.config["allow"], json!(["PAIRED", "SINGLE"]));
        assert_eq!(rp.params()["min_reads"], json!(1000));
        assert_eq!(rp.description(), Some("Bulk RNA-seq submission checks"));
        Ok(())
    }

    #[test]
    fn test_meta_id_overrides_name() -> Result<()> {
        let (_dir, path) = write(
            "meta: {id: RP-1, name: Pretty name, version: '1.0.0'}\nrules:\n  - {id: r, type: unique, column: id}\n",
        )?;
        let rp = load_rulepack(&path)?;
        assert_eq!(rp.id(), "RP-1");
        assert_eq!(rp.name(), "Pretty name");
        assert_eq!(rp.description(), None);
        Ok(())
    }

    #[test]
    fn test_unknown_rule_type_survives_loading() -> Result<()> {
        let (_dir, path) = write(
            "meta: {name: RP, version: '1'}\nrules:\n  - {id: r, type: from_the_future}\n",
        )?;
        let rp = load_rulepack(&path)?;
        assert_eq!(rp.rules()[0].rule_type, "from_the_future");
        Ok(())
    }

    #[test]
    fn test_error_kinds() -> Result<()> {
        let dir = tempdir()?;
        assert!(matches!(
            load_rulepack(&dir.path().join("missing.yaml")),
            Err(InfrastructureError::RulepackNotFound(_))
        ));

        let (_d, bad_yaml) = write("meta: [unclosed\n")?;
        assert!(matches!(
            load_rulepack(&bad_yaml),
            Err(InfrastructureError::RulepackParse { .. })
        ));

        let (_d, list) = write("- just\n- a list\n")?;
        assert!(matches!(
            load_rulepack(&list),
            Err(InfrastructureError::RulepackInvalid { .. })
        ));

        let (_d, no_rules) = write("meta: {name: RP, version: '1'}\nrules: []\n")?;
        let err = load_rulepack(&no_rules).unwrap_err();
        assert!(matches!(err, InfrastructureError::RulepackInvalid { .. }));
        assert!(err.to_string().contains("at least one rule"));
        Ok(())
    }

    #[test]
    fn test_duplicate_ids_rejected() -> Result<()> {
        let (_d, path) = write(
            "meta: {name: RP, version: '1'}\nrules:\n  - {id: r, type: unique}\n  - {id: r, type: enum}\n",
        )?;
        let err = load_rulepack(&path).unwrap_err();
        assert!(matches!(err, InfrastructureError::RulepackInvalid { .. }));
        assert!(err.to_string().contains("duplicate"));
        Ok(())
    }
}
