//! Read-only views of the store: profile listing and status
//!
//! Status reports the primary model found in the active config next to the
//! recorded profile name. The two can disagree after a hand edit that has not
//! been reconciled yet; that is shown, not corrected.

use std::fmt::Write as _;

use profile_merge::paths::{get_path, PRIMARY_MODEL};
use serde::Serialize;
use serde_json::Value;

use crate::error::ProfileResult;
use crate::store::{ConfigStore, ProfileEntry};

/// One line of the profile listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub primary: String,
    pub current: bool,
}

impl ProfileSummary {
    fn from_entry(entry: &ProfileEntry, current: Option<&str>) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.display_name().to_string(),
            description: entry.overlay.description.clone(),
            primary: entry.overlay.primary.clone(),
            current: current == Some(entry.id.as_str()),
        }
    }
}

/// Current state of the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Last applied profile name
    pub current_profile: Option<String>,

    /// Primary model embedded in the active config
    pub active_primary: Option<String>,

    /// Whether the base config exists
    pub initialized: bool,

    /// Number of base snapshots on disk
    pub backups: usize,

    pub profiles: Vec<ProfileSummary>,
}

impl StatusReport {
    /// Whether the active config's primary model differs from the recorded
    /// profile's primary
    pub fn diverged(&self) -> bool {
        let Some(current) = self.current_profile.as_deref() else {
            return false;
        };
        match self.profiles.iter().find(|p| p.id == current) {
            Some(profile) => self.active_primary.as_deref() != Some(profile.primary.as_str()),
            None => false,
        }
    }

    /// Human-readable rendering
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Current profile: {}",
            self.current_profile.as_deref().unwrap_or("(none)")
        );
        let _ = writeln!(
            out,
            "Active model:    {}",
            self.active_primary.as_deref().unwrap_or("(none)")
        );
        if !self.initialized {
            let _ = writeln!(out, "Base config:     missing (run with --init)");
        }
        if self.diverged() {
            let _ = writeln!(
                out,
                "Note: active config was edited since the last switch; run --sync to keep the edits"
            );
        }
        let _ = writeln!(out, "Backups:         {}", self.backups);
        out.push('\n');
        out.push_str(&render_profiles(&self.profiles));
        out
    }
}

/// Summaries of every readable profile
pub fn list_profiles(store: &ConfigStore) -> ProfileResult<Vec<ProfileSummary>> {
    let current = store.current_profile()?;
    Ok(store
        .list_profiles()?
        .iter()
        .map(|entry| ProfileSummary::from_entry(entry, current.as_deref()))
        .collect())
}

/// Gather the full status report
pub fn status(store: &ConfigStore) -> ProfileResult<StatusReport> {
    let active_primary = store.load_active()?.as_ref().and_then(|active| {
        get_path(active, PRIMARY_MODEL)
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    Ok(StatusReport {
        current_profile: store.current_profile()?,
        active_primary,
        initialized: store.layout().base_config().exists(),
        backups: store.list_backups()?.len(),
        profiles: list_profiles(store)?,
    })
}

/// Human-readable profile listing
pub fn render_profiles(profiles: &[ProfileSummary]) -> String {
    let mut out = String::new();
    if profiles.is_empty() {
        out.push_str("No profiles found. Run with --init to install the defaults.\n");
        return out;
    }

    let _ = writeln!(out, "Available profiles ({} total):\n", profiles.len());
    let width = profiles.iter().map(|p| p.id.len()).max().unwrap_or(0);
    for profile in profiles {
        let marker = if profile.current { "*" } else { " " };
        let _ = writeln!(
            out,
            "  {} {:<width$}  {} ({})",
            marker,
            profile.id,
            profile.name,
            profile.primary,
            width = width
        );
        if !profile.description.is_empty() {
            let _ = writeln!(out, "    {:<width$}  {}", "", profile.description, width = width);
        }
    }
    out
}
