// fairy-core/src/domain/rulepack.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::report::Level;

/// Flat key -> scalar mapping of run parameters, kept exactly as supplied.
pub type Params = BTreeMap<String, Value>;

/// Check-specific configuration; only the check selected by `Rule::rule_type` reads it.
pub type RuleConfig = Map<String, Value>;

/// Declared severity of a rule. Findings of a rule surface at this level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[serde(alias = "warning")]
    Warn,
    #[default]
    #[serde(alias = "error")]
    Fail,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }

    /// The level a violating outcome takes for a rule of this severity.
    pub fn level(&self) -> Level {
        match self {
            Self::Warn => Level::Warn,
            Self::Fail => Level::Fail,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" | "warning" => Ok(Self::Warn),
            "fail" | "error" => Ok(Self::Fail),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    /// Declared check type, kept verbatim so unknown types fail closed at dispatch.
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub config: RuleConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Rule {
    pub fn new(id: impl Into<String>, rule_type: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            rule_type: rule_type.into(),
            severity,
            config: RuleConfig::new(),
            description: None,
            hint: None,
        }
    }

    /// Builder-style helper, mostly for tests and programmatic rulepacks.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.config.insert(key.to_string(), value.into());
        self
    }

    pub fn input(&self) -> Option<&str> {
        self.config.get("input").and_then(Value::as_str)
    }

    pub fn column(&self) -> Option<&str> {
        self.config.get("column").and_then(Value::as_str)
    }
}

/// What identifies a rulepack for provenance: id, version and content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulepackIdentity {
    pub id: String,
    pub version: String,
    pub sha256: String,
}

/// A validated, read-only rulepack.
#[derive(Debug, Clone, PartialEq)]
pub struct Rulepack {
    identity: RulepackIdentity,
    name: Option<String>,
    description: Option<String>,
    source_path: Option<String>,
    rules: Vec<Rule>,
    params: Params,
}

impl Rulepack {
    /// Enforces the load-time invariants: non-empty identity, at least one rule,
    /// unique rule ids.
    pub fn new(
        identity: RulepackIdentity,
        rules: Vec<Rule>,
        params: Params,
    ) -> Result<Self, DomainError> {
        if identity.id.trim().is_empty() {
            return Err(DomainError::MissingRulepackField { field: "id".into() });
        }
        if identity.version.trim().is_empty() {
            return Err(DomainError::MissingRulepackField {
                field: "version".into(),
            });
        }
        if rules.is_empty() {
            return Err(DomainError::EmptyRulepack(identity.id));
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.id.trim().is_empty() {
                return Err(DomainError::MissingRulepackField {
                    field: "rules[].id".into(),
                });
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(DomainError::DuplicateRuleId(rule.id.clone()));
            }
        }
        validate_params(&params)?;

        Ok(Self {
            identity,
            name: None,
            description: None,
            source_path: None,
            rules,
            params,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn identity(&self) -> &RulepackIdentity {
        &self.identity
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn version(&self) -> &str {
        &self.identity.version
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.identity.id)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Default params declared by the rulepack itself (not hashed into the run).
    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Rejects nested values: params are a flat key -> scalar mapping.
pub fn validate_params(params: &Params) -> Result<(), DomainError> {
    for (key, value) in params {
        if key.trim().is_empty() {
            return Err(DomainError::InvalidParam {
                key: key.clone(),
                reason: "empty key".into(),
            });
        }
        if value.is_array() || value.is_object() {
            return Err(DomainError::InvalidParam {
                key: key.clone(),
                reason: "value must be a scalar".into(),
            });
        }
    }
    Ok(())
}
