// fairy-core/src/application/mod.rs

pub mod assembler;
pub mod ports;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use fairy_core::application::{ReportAssembler, RunRequest};`

pub use assembler::{ReportAssembler, RunRequest};
pub use ports::{RenderContext, ReportRenderer};
