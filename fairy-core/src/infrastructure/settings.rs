// fairy-core/src/infrastructure/settings.rs
//
// Engine settings: built-in defaults, then an optional `fairy.yaml`, then
// environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::infrastructure::error::InfrastructureError;

pub const SETTINGS_FILE: &str = "fairy.yaml";
pub const ENV_STRICT_TABLES: &str = "FAIRY_STRICT_TABLES";
pub const ENV_LEGACY_BLOCK: &str = "FAIRY_LEGACY_BLOCK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Reject ragged rows instead of padding them.
    pub strict_tables: bool,
    /// Emit the deprecated `_legacy` block in written reports.
    pub legacy_block: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            strict_tables: false,
            legacy_block: true,
        }
    }
}

#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_settings(dir: &Path) -> Result<EngineSettings, InfrastructureError> {
    let mut settings = match find_settings_file(dir) {
        Some(path) => {
            info!(path = %path.display(), "Loading engine settings");
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                EngineSettings::default()
            } else {
                serde_yaml::from_str(&content).map_err(|e| {
                    InfrastructureError::ConfigError(format!("{}: {}", path.display(), e))
                })?
            }
        }
        None => EngineSettings::default(),
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn find_settings_file(dir: &Path) -> Option<PathBuf> {
    ["fairy.yaml", "fairy.yml"]
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Layers environment values over `settings`. `lookup` is injected so tests
/// need not touch the process environment.
pub fn apply_env_overrides<F>(settings: &mut EngineSettings, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_STRICT_TABLES) {
        let val = parse_flag(ENV_STRICT_TABLES, &raw)?;
        info!(old = settings.strict_tables, new = val, "Overriding strict_tables via ENV");
        settings.strict_tables = val;
    }
    if let Some(raw) = lookup(ENV_LEGACY_BLOCK) {
        let val = parse_flag(ENV_LEGACY_BLOCK, &raw)?;
        info!(old = settings.legacy_block, new = val, "Overriding legacy_block via ENV");
        settings.legacy_block = val;
    }
    Ok(())
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, InfrastructureError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(InfrastructureError::ConfigError(format!(
            "{} must be a boolean flag, got '{}'",
            key, other
        ))),
    }
}
