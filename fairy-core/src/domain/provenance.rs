// fairy-core/src/domain/provenance.rs
//
// Dataset identity: a content address over everything that determines a
// report's findings (input bytes, rulepack, params).

use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::domain::canonical::{canonical_json, sha256_hex};
use crate::domain::error::DomainError;
use crate::domain::rulepack::{Params, RulepackIdentity};

/// Version tag of the identity payload layout. Bump it whenever the payload
/// shape changes so old and new ids can never collide.
pub const CANON_VERSION_V1: &str = "fairy-canon@1";

pub const DATASET_ID_PREFIX: &str = "sha256:";

fn canonical(value: &Value) -> Result<String, DomainError> {
    canonical_json(value).map_err(|e| DomainError::Canonicalization(e.to_string()))
}

/// Hash of exactly the params the caller supplied; `{}` when there are none.
pub fn compute_params_sha256(params: Option<&Params>) -> Result<String, DomainError> {
    let empty = Params::new();
    let params = params.unwrap_or(&empty);
    let value = serde_json::to_value(params).map_err(|e| DomainError::Canonicalization(e.to_string()))?;
    Ok(sha256_hex(canonical(&value)?.as_bytes()))
}

/// The canonical payload the dataset id is computed over.
pub fn dataset_id_payload(
    inputs_sha256: &BTreeMap<String, String>,
    rulepack: &RulepackIdentity,
    params_sha256: &str,
    canon_version: &str,
) -> Value {
    let inputs: serde_json::Map<String, Value> = inputs_sha256
        .iter()
        .map(|(name, sha)| (name.clone(), json!({ "sha256": sha })))
        .collect();

    json!({
        "algorithm": "sha256",
        "canon_version": canon_version,
        "includes": ["inputs.sha256", "rulepack.sha256", "params.sha256"],
        "inputs": inputs,
        "params": { "sha256": params_sha256 },
        "rulepack": {
            "id": rulepack.id,
            "sha256": rulepack.sha256,
            "version": rulepack.version,
        },
    })
}

/// `sha256:<hex64>` over the canonical payload.
pub fn compute_dataset_id(
    inputs_sha256: &BTreeMap<String, String>,
    rulepack: &RulepackIdentity,
    params_sha256: &str,
    canon_version: &str,
) -> Result<String, DomainError> {
    let payload = dataset_id_payload(inputs_sha256, rulepack, params_sha256, canon_version);
    let digest = sha256_hex(canonical(&payload)?.as_bytes());
    Ok(format!("{}{}", DATASET_ID_PREFIX, digest))
}
