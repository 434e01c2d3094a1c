//! Error kinds surfaced by profile operations
//!
//! Every variant aborts the current invocation; the CLI maps all of them to
//! exit status 1.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use profile_merge::MergeError;

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors from profile store, reconciliation and switch operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile '{name}' not found. Available profiles: {}", format_available(.available))]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("Base config not found at {}. Run with --init first.", .path.display())]
    BaseMissing { path: PathBuf },

    #[error("Failed to generate active config: {0}")]
    GenerationFailed(String),

    #[error("Missing runtime dependency: {0}")]
    DependencyMissing(String),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidSetting { name: String, value: String },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Timed out after {waited:?} waiting for lock {}", .path.display())]
    LockTimeout { path: PathBuf, waited: Duration },
}

impl ProfileError {
    /// Wrap an IO error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON parse error with the path of the document
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

impl From<MergeError> for ProfileError {
    fn from(err: MergeError) -> Self {
        Self::GenerationFailed(err.to_string())
    }
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "(none)".to_string()
    } else {
        available.join(", ")
    }
}
