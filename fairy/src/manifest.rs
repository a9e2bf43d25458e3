// fairy/src/manifest.rs
//
// Handoff manifest: what was checked, by which rulepack, and the hash of every
// file handed over alongside the report.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use fairy_core::Report;
use fairy_core::infrastructure::hashing::hash_file;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Metadata,
    Report,
    Log,
    Data,
    Other,
}

impl Role {
    /// Infers a role from the file name alone.
    pub fn infer(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match name.as_str() {
            "manifest.json" | "samples.tsv" | "files.tsv" => return Role::Metadata,
            _ => {}
        }
        if name.contains("report") && (ext == "json" || ext == "md") {
            return Role::Report;
        }
        match ext.as_str() {
            "log" => Role::Log,
            "csv" => Role::Data,
            _ => Role::Other,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RulepackRef {
    pub id: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub schema_version: &'static str,
    pub dataset_id: String,
    pub created_at_utc: String,
    pub fairy_version: String,
    pub hash_algorithm: &'static str,
    pub rulepack: RulepackRef,
    pub source_report: String,
    pub files: Vec<ManifestFile>,
}

/// Builds the manifest for `report`. `inputs` are the checked tables and
/// `outputs` the files written next to the manifest.
pub fn build(
    report: &Report,
    fairy_version: &str,
    source_report: &str,
    inputs: &[PathBuf],
    outputs: &[PathBuf],
) -> anyhow::Result<Manifest> {
    let mut files = Vec::with_capacity(inputs.len() + outputs.len());
    for path in inputs {
        // Inputs are data unless their name says otherwise
        let role = match Role::infer(path) {
            Role::Other => Role::Data,
            role => role,
        };
        files.push(entry(path, role)?);
    }
    for path in outputs {
        files.push(entry(path, Role::infer(path))?);
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let rulepack = &report.metadata().rulepack;
    Ok(Manifest {
        schema_version: MANIFEST_SCHEMA_VERSION,
        dataset_id: report.dataset_id().to_string(),
        created_at_utc: report.generated_at().to_string(),
        fairy_version: fairy_version.to_string(),
        hash_algorithm: "sha256",
        rulepack: RulepackRef {
            id: rulepack.id.clone(),
            version: rulepack.version.clone(),
        },
        source_report: source_report.to_string(),
        files,
    })
}

fn entry(path: &Path, role: Role) -> anyhow::Result<ManifestFile> {
    let sha256 =
        hash_file(path).with_context(|| format!("Failed to hash {}", path.display()))?;
    Ok(ManifestFile {
        path: path.display().to_string(),
        sha256,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_inference() {
        assert_eq!(Role::infer(Path::new("out/manifest.json")), Role::Metadata);
        assert_eq!(Role::infer(Path::new("samples.tsv")), Role::Metadata);
        assert_eq!(Role::infer(Path::new("preflight_report.json")), Role::Report);
        assert_eq!(Role::infer(Path::new("preflight_report.md")), Role::Report);
        assert_eq!(Role::infer(Path::new("report.txt")), Role::Other);
        assert_eq!(Role::infer(Path::new("run.log")), Role::Log);
        assert_eq!(Role::infer(Path::new("counts.CSV")), Role::Data);
        assert_eq!(Role::infer(Path::new("notes")), Role::Other);
    }
}
