// fairy-core/src/domain/checks/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Rule-level failures. Never fatal: the aggregator turns each of these into a
/// synthetic fail-level result and evaluation moves on to the next rule.
#[derive(Error, Debug, Diagnostic)]
pub enum CheckError {
    #[error("Unsupported rule type '{rule_type}'")]
    #[diagnostic(
        code(fairy::check::unsupported_rule_type),
        help("Supported types: {supported:?}")
    )]
    UnsupportedRuleType {
        rule_type: String,
        supported: Vec<String>,
    },

    #[error("Missing config key '{0}'")]
    #[diagnostic(code(fairy::check::config_missing))]
    MissingConfig(String),

    #[error("Invalid config key '{key}': {reason}")]
    #[diagnostic(code(fairy::check::config_invalid))]
    InvalidConfig { key: String, reason: String },

    #[error("Rule must name its input; available inputs: {available:?}")]
    #[diagnostic(code(fairy::check::input_required), help("Set `input` in the rule config."))]
    InputRequired { available: Vec<String> },

    #[error("Input '{input}' not found; available inputs: {available:?}")]
    #[diagnostic(code(fairy::check::input_not_found))]
    UnknownInput {
        input: String,
        available: Vec<String>,
    },

    #[error("Column '{column}' not found in input '{input}'")]
    #[diagnostic(code(fairy::check::column_not_found))]
    ColumnNotFound { input: String, column: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    #[diagnostic(code(fairy::check::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Check raised an error: {0}")]
    #[diagnostic(code(fairy::check::runtime_error))]
    Runtime(String),
}

impl CheckError {
    /// Stable snake_case code written to `meta.error`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedRuleType { .. } => "unsupported_rule_type",
            Self::MissingConfig(_) => "config_missing",
            Self::InvalidConfig { .. } => "config_invalid",
            Self::InputRequired { .. } => "input_required",
            Self::UnknownInput { .. } => "input_not_found",
            Self::ColumnNotFound { .. } => "column_not_found",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::Runtime(_) => "runtime_error",
        }
    }

    pub fn missing_column(input: &str, column: &str) -> Self {
        Self::ColumnNotFound {
            input: input.to_string(),
            column: column.to_string(),
        }
    }
}
