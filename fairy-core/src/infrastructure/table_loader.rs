// fairy-core/src/infrastructure/table_loader.rs

use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::domain::table::Table;
use crate::error::FairyError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::table_source::{LoadOptions, TableSource};

const TABLE_EXTENSIONS: [&str; 4] = ["csv", "tsv", "tab", "txt"];

/// Delimited-text loader (CSV, TSV). Every cell is read as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableLoader;

impl CsvTableLoader {
    pub fn new() -> Self {
        Self
    }

    /// Tab for `.tsv`/`.tab`, comma otherwise.
    pub fn delimiter_for(path: &Path) -> u8 {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("tsv") | Some("tab") => b'\t',
            _ => b',',
        }
    }
}

impl TableSource for CsvTableLoader {
    fn load(&self, path: &Path, options: &LoadOptions) -> Result<Table, FairyError> {
        Ok(read_delimited(path, options)?)
    }
}

#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
fn read_delimited(path: &Path, options: &LoadOptions) -> Result<Table, InfrastructureError> {
    if !path.is_file() {
        return Err(InfrastructureError::InputNotFound(path.to_path_buf()));
    }
    let malformed = |reason: String| InfrastructureError::MalformedTable {
        path: path.to_path_buf(),
        reason,
    };

    let delimiter = options
        .delimiter
        .unwrap_or_else(|| CsvTableLoader::delimiter_for(path));
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(!options.strict)
        .from_path(path)
        .map_err(|e| malformed(e.to_string()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(malformed("missing header row".into()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| malformed(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(rows = rows.len(), cols = columns.len(), "table loaded");
    Ok(Table::new(columns, rows))
}

/// Resolves an input argument: a file is used as-is; a directory must hold
/// exactly one delimited-text file at its top level.
pub fn resolve_input_path(path: &Path) -> Result<PathBuf, InfrastructureError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        return Err(InfrastructureError::InputNotFound(path.to_path_buf()));
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| TABLE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    candidates.sort();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        found => Err(InfrastructureError::AmbiguousInputDir {
            path: path.to_path_buf(),
            found,
        }),
    }
}
