// fairy-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts the application depends on (TableSource, Clock).
pub mod ports;

// 2. Domain (business core)
// Tables, rulepacks, checks, aggregation, provenance, report model.
// Depends on nothing else (no infra, no app).
pub mod domain;

// 3. Infrastructure (Adapters)
// CSV/TSV loading, hashing, rulepack/params/settings files, Markdown rendering.
pub mod infrastructure;

// 4. Application (Use Cases)
// The report assembler that orchestrates a single preflight run.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use application::{ReportAssembler, RunRequest};
pub use domain::checks::CheckRegistry;
pub use domain::report::{Level, Report};
pub use error::FairyError;

/// Version of the engine embedded in reports and manifests.
pub const FAIRY_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
