//! Well-known locations inside a gateway config document
//!
//! Paths are given as key segments from the document root.

use serde_json::{Map, Value};

/// Active model selection (`agents.defaults.model.primary`)
pub const PRIMARY_MODEL: &[&str] = &["agents", "defaults", "model", "primary"];

/// Per-model settings mapping (`agents.defaults.models`)
pub const MODEL_SETTINGS: &[&str] = &["agents", "defaults", "models"];

/// Top-level provider block, only present while a profile supplies providers
pub const PROVIDER_BLOCK: &str = "models";

/// Modification timestamp stamped on every switch (`meta.lastTouchedAt`)
pub const LAST_TOUCHED_AT: &[&str] = &["meta", "lastTouchedAt"];

/// Look up a value by key segments
pub fn get_path<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |current, key| current.get(*key))
}

/// Set a value by key segments.
///
/// Missing intermediate objects are created. Intermediates that exist but are
/// not objects are replaced by empty objects.
pub fn set_path(doc: &mut Value, path: &[&str], value: Value) {
    match path.split_first() {
        None => *doc = value,
        Some((key, rest)) => {
            if !doc.is_object() {
                *doc = Value::Object(Map::new());
            }
            if let Value::Object(map) = doc {
                let child = map.entry((*key).to_string()).or_insert(Value::Null);
                set_path(child, rest, value);
            }
        }
    }
}

/// Remove a value by key segments, returning it if it was present
pub fn remove_path(doc: &mut Value, path: &[&str]) -> Option<Value> {
    let (last, parents) = path.split_last()?;
    let mut current = doc;
    for key in parents {
        current = current.get_mut(*key)?;
    }
    current.as_object_mut()?.remove(*last)
}
