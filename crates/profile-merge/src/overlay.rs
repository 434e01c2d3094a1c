//! Profile overlays and their application onto a base config

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::extract::extract_base;
use crate::paths::{set_path, LAST_TOUCHED_AT, MODEL_SETTINGS, PRIMARY_MODEL, PROVIDER_BLOCK};

/// Provider block mode telling the gateway to merge these providers with its
/// built-in catalog
pub const PROVIDER_MERGE_MODE: &str = "merge";

/// A named, model-specific config fragment.
///
/// Every field is optional on disk; missing fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverlay {
    /// Display name
    pub name: String,

    /// Free-form description shown in listings
    pub description: String,

    /// Primary model identifier (e.g. `anthropic/claude-opus-4-5`)
    pub primary: String,

    /// Per-model settings keyed by model identifier
    pub models: Map<String, Value>,

    /// Provider configuration keyed by provider identifier
    pub providers: Map<String, Value>,
}

impl ProfileOverlay {
    /// Parse from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether this profile carries its own provider block
    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    /// The top-level provider block for this profile, if it has providers
    pub fn provider_block(&self) -> Option<Value> {
        self.has_providers().then(|| {
            json!({
                "mode": PROVIDER_MERGE_MODE,
                "providers": self.providers,
            })
        })
    }
}

/// Build an active config from a base config and a profile.
///
/// The base is first reduced to its base-only form, so model settings and
/// providers from an earlier profile never leak into the result. The profile
/// then sets the primary model, the per-model settings and the touch stamp,
/// and the provider block is present iff the profile has providers.
pub fn apply_overlay(base: &Value, overlay: &ProfileOverlay, touched_at: DateTime<Utc>) -> Value {
    let mut active = extract_base(base);
    set_path(&mut active, PRIMARY_MODEL, Value::String(overlay.primary.clone()));
    set_path(&mut active, MODEL_SETTINGS, Value::Object(overlay.models.clone()));
    set_path(
        &mut active,
        LAST_TOUCHED_AT,
        Value::String(touched_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    if let Some(block) = overlay.provider_block() {
        set_path(&mut active, &[PROVIDER_BLOCK], block);
    }
    active
}
