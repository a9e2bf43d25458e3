// fairy-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- INPUT TABLES ---
    #[error("Input file not found: {0}")]
    #[diagnostic(
        code(fairy::infra::input_not_found),
        help("Check the path given for this input.")
    )]
    InputNotFound(PathBuf),

    #[error("Malformed table '{path}': {reason}")]
    #[diagnostic(
        code(fairy::infra::malformed_table),
        help("Inputs must be UTF-8 CSV/TSV files with a header row.")
    )]
    MalformedTable { path: PathBuf, reason: String },

    #[error("Input directory '{path}' must contain exactly one CSV/TSV file, found {found}")]
    #[diagnostic(code(fairy::infra::ambiguous_input))]
    AmbiguousInputDir { path: PathBuf, found: usize },

    // --- RULEPACK ---
    #[error("Rulepack not found: {0}")]
    #[diagnostic(code(fairy::infra::rulepack_not_found))]
    RulepackNotFound(PathBuf),

    #[error("Rulepack '{path}' could not be parsed: {reason}")]
    #[diagnostic(
        code(fairy::infra::rulepack_parse),
        help("Check your YAML syntax (indentation, types).")
    )]
    RulepackParse { path: PathBuf, reason: String },

    #[error("Rulepack '{path}' is invalid: {reason}")]
    #[diagnostic(code(fairy::infra::rulepack_invalid))]
    RulepackInvalid { path: PathBuf, reason: String },

    // --- PARAMS ---
    #[error("Params file '{path}' is invalid: {reason}")]
    #[diagnostic(
        code(fairy::infra::params),
        help("Params must be a flat YAML mapping of key -> scalar.")
    )]
    ParamsInvalid { path: PathBuf, reason: String },

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(fairy::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / JSON ---
    #[error("JSON Error: {0}")]
    #[diagnostic(code(fairy::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(fairy::infra::config))]
    ConfigError(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(fairy::infra::template),
        help("Check the Markdown template syntax ({{ ... }}).")
    )]
    TemplateError(#[from] minijinja::Error),
}
