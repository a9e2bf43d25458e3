// fairy-core/src/infrastructure/params.rs

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::rulepack::{Params, validate_params};
use crate::infrastructure::error::InfrastructureError;

/// Reads a params file: a flat YAML mapping of key -> scalar. An empty file
/// means no params.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_params(path: &Path) -> Result<Params, InfrastructureError> {
    let invalid = |reason: String| InfrastructureError::ParamsInvalid {
        path: path.to_path_buf(),
        reason,
    };
    if !path.is_file() {
        return Err(invalid("file not found".into()));
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Params::new());
    }
    let value: Value = serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    let params: Params = match value {
        Value::Null => Params::new(),
        Value::Object(map) => map.into_iter().collect(),
        _ => return Err(invalid("top level must be a mapping".into())),
    };
    validate_params(&params).map_err(|e| invalid(e.to_string()))?;

    info!(count = params.len(), "Params loaded");
    Ok(params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_flat_scalars() -> Result<()> {
        let dir = tempdir()?;
        let p = dir.path().join("params.yaml");
        fs::write(&p, "min_reads: 1000\norganism: human\nstrict: true\nnote: ~\n")?;

        let params = load_params(&p)?;
        assert_eq!(params["min_reads"], json!(1000));
        assert_eq!(params["strict"], json!(true));
        assert_eq!(params["note"], Value::Null);
        Ok(())
    }

    #[test]
    fn test_empty_file_is_no_params() -> Result<()> {
        let dir = tempdir()?;
        let p = dir.path().join("params.yaml");
        fs::write(&p, "")?;
        assert!(load_params(&p)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_rejects_nested_and_non_mapping() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("nested.yaml");
        fs::write(&nested, "limits:\n  min: 1\n")?;
        assert!(matches!(
            load_params(&nested),
            Err(InfrastructureError::ParamsInvalid { .. })
        ));

        let list = dir.path().join("list.yaml");
        fs::write(&list, "- 1\n- 2\n")?;
        assert!(matches!(
            load_params(&list),
            Err(InfrastructureError::ParamsInvalid { .. })
        ));

        assert!(matches!(
            load_params(&dir.path().join("absent.yaml")),
            Err(InfrastructureError::ParamsInvalid { .. })
        ));
        Ok(())
    }
}
