//! Change detection between config documents
//!
//! Edits are detected by structural equality of parsed values: object key
//! order never matters, array order always does. The RFC 8785 (JCS) digest is
//! only used to label documents in logs and to dedupe backups.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::MergeError;
use crate::extract::extract_base;
use crate::paths::{remove_path, LAST_TOUCHED_AT};

/// Projection used to decide whether two documents differ in shared settings.
///
/// This is [`extract_base`] with the switch timestamp removed, since every
/// switch stamps a fresh one. An object left empty by that removal is
/// dropped as well.
pub fn comparison_projection(doc: &Value) -> Value {
    let mut projection = extract_base(doc);
    remove_path(&mut projection, LAST_TOUCHED_AT);

    let meta_key = LAST_TOUCHED_AT[0];
    let meta_emptied = projection
        .get(meta_key)
        .and_then(Value::as_object)
        .is_some_and(|meta| meta.is_empty());
    if meta_emptied {
        remove_path(&mut projection, &[meta_key]);
    }

    projection
}

/// Whether two documents carry the same shared (non-model) settings
pub fn semantically_equal(a: &Value, b: &Value) -> bool {
    comparison_projection(a) == comparison_projection(b)
}

/// SHA-256 hex digest of the JCS canonical form of a value
pub fn canonical_digest(value: &Value) -> Result<String, MergeError> {
    let jcs_bytes = serde_json_canonicalizer::to_vec(value)
        .map_err(|e| MergeError::Canonicalization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&jcs_bytes);
    Ok(hex::encode(hasher.finalize()))
}
