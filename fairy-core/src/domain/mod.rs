pub mod aggregate;
pub mod canonical;
pub mod checks;
pub mod error;
pub mod provenance;
pub mod report;
pub mod rulepack;
pub mod table;

// Convenience re-exports to keep imports short elsewhere
pub use error::DomainError;
pub use rulepack::{Params, Rule, Rulepack, RulepackIdentity, Severity};
pub use table::Table;
