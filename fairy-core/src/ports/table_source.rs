// fairy-core/src/ports/table_source.rs

// What the assembler needs to obtain a table, without knowing the file format.

use std::path::Path;

use crate::domain::table::Table;
use crate::error::FairyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Overrides the extension-based delimiter.
    pub delimiter: Option<u8>,
    /// Reject rows whose width differs from the header instead of padding them.
    pub strict: bool,
}

pub trait TableSource: Send + Sync {
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Table, FairyError>;
}
