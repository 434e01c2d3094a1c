//! Structural checks on a generated active config

use serde_json::Value;

use crate::error::MergeError;
use crate::paths::{get_path, MODEL_SETTINGS, PRIMARY_MODEL, PROVIDER_BLOCK};

/// Check that a candidate active config is well-formed before it is committed.
///
/// The candidate must be an object that survives a serialize/parse round trip
/// unchanged, name a non-empty primary model, carry an object of per-model
/// settings, and, when a provider block is present, list at least one
/// provider.
pub fn validate_candidate(candidate: &Value) -> Result<(), MergeError> {
    if !candidate.is_object() {
        return Err(MergeError::InvalidCandidate(
            "top-level value is not an object".to_string(),
        ));
    }

    let bytes = serde_json::to_vec(candidate)?;
    let reparsed: Value = serde_json::from_slice(&bytes)?;
    if &reparsed != candidate {
        return Err(MergeError::InvalidCandidate(
            "document does not survive a JSON round trip".to_string(),
        ));
    }

    match get_path(candidate, PRIMARY_MODEL).and_then(Value::as_str) {
        Some(primary) if !primary.trim().is_empty() => {}
        _ => {
            return Err(MergeError::InvalidCandidate(format!(
                "{} must be a non-empty string",
                PRIMARY_MODEL.join(".")
            )))
        }
    }

    if !get_path(candidate, MODEL_SETTINGS).is_some_and(Value::is_object) {
        return Err(MergeError::InvalidCandidate(format!(
            "{} must be an object",
            MODEL_SETTINGS.join(".")
        )));
    }

    if let Some(block) = candidate.get(PROVIDER_BLOCK) {
        let has_providers = block
            .get("providers")
            .and_then(Value::as_object)
            .is_some_and(|providers| !providers.is_empty());
        if !has_providers {
            return Err(MergeError::InvalidCandidate(format!(
                "{}.providers must be a non-empty object when present",
                PROVIDER_BLOCK
            )));
        }
    }

    Ok(())
}
