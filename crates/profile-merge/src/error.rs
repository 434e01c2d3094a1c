//! Errors from merge, digest and validation operations

/// Errors produced while building or checking config documents
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Invalid candidate config: {0}")]
    InvalidCandidate(String),

    #[error("JCS canonicalization error: {0}")]
    Canonicalization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
