// fairy-core/src/application/ports/renderer.rs

use crate::domain::report::Report;
use crate::error::FairyError;

/// Run facts a rendering needs that are not part of the report itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub fairy_version: String,
    /// Rule codes reported by the previous run and absent from this one.
    /// `None` when there is no previous run to compare against.
    pub resolved_since_last_run: Option<Vec<String>>,
}

pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &Report, context: &RenderContext) -> Result<String, FairyError>;
}
