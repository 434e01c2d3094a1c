//! Reconciliation: fold manual edits of the active config back into the base
//!
//! Runs before every switch so a hand edit to the active config is never
//! discarded by regenerating it.

use std::path::PathBuf;

use chrono::Local;
use profile_merge::{canonical_digest, comparison_projection, extract_base};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ProfileResult;
use crate::store::ConfigStore;

/// What a reconciliation pass did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// No active config, nothing to reconcile
    NoActiveConfig,
    /// Base config was missing and has been derived from the active config
    Bootstrapped,
    /// Active config carries no edits to shared settings
    Unchanged,
    /// Shared settings differed; the previous base was snapshotted and replaced
    Absorbed { backup: Option<PathBuf> },
}

/// Take the store lock and reconcile.
///
/// A root with neither an active config nor a `config/` directory has
/// nothing to reconcile and is left as is.
pub fn sync(store: &ConfigStore) -> ProfileResult<SyncOutcome> {
    let layout = store.layout();
    if !layout.config_dir().is_dir() && !layout.active_config().exists() {
        debug!(root = %layout.root().display(), "empty store, nothing to reconcile");
        return Ok(SyncOutcome::NoActiveConfig);
    }

    let _lock = store.lock()?;
    reconcile(store)
}

/// Reconcile without locking; callers must hold the store lock
pub(crate) fn reconcile(store: &ConfigStore) -> ProfileResult<SyncOutcome> {
    let Some(active) = store.load_active()? else {
        debug!("no active config, nothing to reconcile");
        return Ok(SyncOutcome::NoActiveConfig);
    };

    let Some(base) = store.load_base()? else {
        store.save_base(&extract_base(&active))?;
        info!(base = %store.layout().base_config().display(), "bootstrapped base config from active config");
        return Ok(SyncOutcome::Bootstrapped);
    };

    let active_projection = comparison_projection(&active);
    let base_projection = comparison_projection(&base);

    if active_projection == base_projection {
        debug!("active config matches base, no edits to absorb");
        return Ok(SyncOutcome::Unchanged);
    }

    let active_digest = canonical_digest(&active_projection)?;
    let base_digest = canonical_digest(&base_projection)?;
    info!(%active_digest, %base_digest, "manual edits detected in active config");

    let backup = store.backup_base(Local::now())?;
    store.save_base(&extract_base(&active))?;

    Ok(SyncOutcome::Absorbed { backup })
}
