//! Base-only projection of a config document

use serde_json::{Map, Value};

use crate::paths::{get_path, remove_path, set_path, MODEL_SETTINGS, PRIMARY_MODEL, PROVIDER_BLOCK};

/// Project a config document onto its base-only form.
///
/// The active model selection is cleared to `null`, the per-model settings
/// mapping is emptied and the provider block is dropped. Everything else is
/// kept as-is. A non-object input is treated as an empty document.
///
/// Applying this twice yields the same value as applying it once.
pub fn extract_base(doc: &Value) -> Value {
    let mut base = if doc.is_object() {
        doc.clone()
    } else {
        Value::Object(Map::new())
    };

    set_path(&mut base, PRIMARY_MODEL, Value::Null);
    set_path(&mut base, MODEL_SETTINGS, Value::Object(Map::new()));
    remove_path(&mut base, &[PROVIDER_BLOCK]);

    base
}

/// Check that a document carries no model-specific state
pub fn is_base_only(doc: &Value) -> bool {
    let primary_cleared = get_path(doc, PRIMARY_MODEL).map_or(true, Value::is_null);
    let settings_empty = get_path(doc, MODEL_SETTINGS)
        .map_or(true, |v| v.as_object().is_some_and(Map::is_empty));
    let no_providers = doc.get(PROVIDER_BLOCK).is_none();

    primary_cleared && settings_empty && no_providers
}
