//! Base/overlay merge logic for gateway config documents.
//!
//! The gateway reads a single JSON config. This crate splits that document
//! into a model-agnostic base and a model-specific overlay, and recombines
//! them:
//!
//! - [`extract_base`] projects any config onto its base-only form
//! - [`apply_overlay`] builds an active config from a base and a profile
//! - [`comparison_projection`] / [`semantically_equal`] detect manual edits
//! - [`validate_candidate`] guards a generated document before it is committed
//!
//! Nothing here touches the filesystem.

mod compare;
mod error;
mod extract;
mod overlay;
pub mod paths;
mod validate;

pub use compare::{canonical_digest, comparison_projection, semantically_equal};
pub use error::MergeError;
pub use extract::{extract_base, is_base_only};
pub use overlay::{apply_overlay, ProfileOverlay, PROVIDER_MERGE_MODE};
pub use validate::validate_candidate;
