//! One-time store initialization
//!
//! Safe to re-run: existing base config and profiles are never overwritten.

use std::fs;

use profile_merge::extract_base;
use serde::Serialize;
use tracing::info;

use crate::defaults::builtin_profiles;
use crate::error::{ProfileError, ProfileResult};
use crate::store::ConfigStore;

/// What initialization created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    /// Base config was derived from the active config
    pub base_created: bool,

    /// Ids of the built-in profiles that were installed
    pub installed_profiles: Vec<String>,
}

impl InitReport {
    /// Whether this run changed anything on disk
    pub fn changed(&self) -> bool {
        self.base_created || !self.installed_profiles.is_empty()
    }
}

/// Create the store directories, derive the base config and seed profiles
pub fn initialize(store: &ConfigStore) -> ProfileResult<InitReport> {
    let layout = store.layout();
    let models_dir = layout.models_dir();
    fs::create_dir_all(&models_dir).map_err(|e| ProfileError::io(&models_dir, e))?;

    let _lock = store.lock()?;
    let mut report = InitReport::default();

    if store.load_base()?.is_none() {
        if let Some(active) = store.load_active()? {
            store.save_base(&extract_base(&active))?;
            info!(base = %layout.base_config().display(), "created base config from active config");
            report.base_created = true;
        }
    }

    if store.profile_ids()?.is_empty() {
        for (id, overlay) in builtin_profiles() {
            if store.install_profile(id, &overlay)? {
                info!(profile = id, "installed built-in profile");
                report.installed_profiles.push(id.to_string());
            }
        }
    }

    Ok(report)
}
