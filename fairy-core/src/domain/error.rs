// fairy-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Duplicate rule id '{0}' in rulepack")]
    #[diagnostic(
        code(fairy::domain::duplicate_rule_id),
        help("Every rule id must be unique within a rulepack.")
    )]
    DuplicateRuleId(String),

    #[error("Rulepack '{0}' declares no rules")]
    #[diagnostic(code(fairy::domain::empty_rulepack))]
    EmptyRulepack(String),

    #[error("Rulepack field '{field}' must not be empty")]
    #[diagnostic(code(fairy::domain::rulepack_field))]
    MissingRulepackField { field: String },

    #[error("Invalid parameter '{key}': {reason}")]
    #[diagnostic(
        code(fairy::domain::params),
        help("Params must be a flat mapping of key -> scalar (string, number, bool, null).")
    )]
    InvalidParam { key: String, reason: String },

    #[error("Invalid timestamp '{0}'")]
    #[diagnostic(
        code(fairy::domain::timestamp),
        help("Use an RFC 3339 timestamp such as 2025-01-01T00:00:00Z.")
    )]
    InvalidTimestamp(String),

    #[error("Could not canonicalize value: {0}")]
    #[diagnostic(code(fairy::domain::canonical))]
    Canonicalization(String),

    #[error("A run needs at least one input table")]
    #[diagnostic(code(fairy::domain::no_inputs), help("Pass inputs as name=path."))]
    NoInputs,

    #[error("Run lifecycle violated: cannot move from {from} to {to}")]
    #[diagnostic(code(fairy::domain::lifecycle))]
    Lifecycle { from: String, to: String },
}
