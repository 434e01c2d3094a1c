//! Profile switch: regenerate the active config from base + overlay
//!
//! An unknown profile is rejected before the store lock is taken, so it
//! leaves no trace on disk. The rest runs under the lock:
//! 1. re-read the requested overlay
//! 2. reconcile manual edits into the base
//! 3. build and validate the candidate
//! 4. atomically replace the active config
//! 5. record the current profile name
//!
//! Any failure before step 4 leaves the active config untouched.

use chrono::Utc;
use profile_merge::{apply_overlay, validate_candidate};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ProfileError, ProfileResult};
use crate::gateway::GatewayProbe;
use crate::reconcile::{reconcile, SyncOutcome};
use crate::store::ConfigStore;

/// Result of a successful switch
#[derive(Debug, Clone, Serialize)]
pub struct SwitchReport {
    /// Profile now active
    pub profile: String,

    /// Profile recorded before the switch
    pub previous: Option<String>,

    /// Primary model of the new profile
    pub primary: String,

    /// Provider ids written to the provider block (empty if none)
    pub providers: Vec<String>,

    /// What reconciliation did before the switch
    pub sync: SyncOutcome,

    /// Whether the gateway was up and needs a restart
    pub restart_required: bool,

    /// Where the gateway was probed
    pub gateway: String,
}

/// Switch the active config to profile `name`
pub fn switch_profile(
    store: &ConfigStore,
    name: &str,
    probe: &dyn GatewayProbe,
) -> ProfileResult<SwitchReport> {
    store.load_profile(name)?;

    let (entry, previous, sync) = {
        let _lock = store.lock()?;

        // the overlay may have changed while waiting for the lock
        let entry = store.load_profile(name)?;
        let sync = reconcile(store)?;

        let base = store.load_base()?.ok_or_else(|| ProfileError::BaseMissing {
            path: store.layout().base_config(),
        })?;

        let candidate = apply_overlay(&base, &entry.overlay, Utc::now());
        validate_candidate(&candidate)?;

        let previous = store.current_profile()?;
        store.commit_active(&candidate)?;
        store.set_current_profile(&entry.id)?;

        (entry, previous, sync)
    };

    info!(
        profile = %entry.id,
        primary = %entry.overlay.primary,
        previous = previous.as_deref().unwrap_or("-"),
        "switched profile"
    );

    let restart_required = probe.is_running();
    if restart_required {
        debug!(gateway = %probe.describe(), "gateway is running, restart required");
    }

    Ok(SwitchReport {
        profile: entry.id,
        previous,
        primary: entry.overlay.primary,
        providers: entry.overlay.providers.keys().cloned().collect(),
        sync,
        restart_required,
        gateway: probe.describe(),
    })
}
