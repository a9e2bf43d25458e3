// fairy-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FairyError {
    // --- DOMAIN ERRORS (rulepack invariants, run lifecycle) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Keeps `?` ergonomic on raw std::io calls without a duplicate enum variant
impl From<std::io::Error> for FairyError {
    fn from(err: std::io::Error) -> Self {
        FairyError::Infrastructure(InfrastructureError::Io(err))
    }
}
