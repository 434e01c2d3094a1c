//! Base config snapshots
//!
//! Snapshots are named `base.json.<YYYYmmdd-HHMMSS>.bak`. Two snapshots in
//! the same second with identical bytes share one file; different bytes get
//! a numeric suffix (`base.json.<ts>.1.bak`). Existing snapshots are never
//! overwritten. A snapshot gets the permissions of `base.json`.

use std::fs::{self, Permissions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::atomic::existing_permissions;
use super::{ConfigStore, BASE_CONFIG_FILE};
use crate::error::{ProfileError, ProfileResult};

/// File name suffix shared by all snapshots
pub const BACKUP_SUFFIX: &str = ".bak";

/// Upper bound on same-second suffixes before giving up
const MAX_COLLISION_SUFFIX: u32 = 1000;

/// Second-granularity stamp used in snapshot names
pub fn backup_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d-%H%M%S").to_string()
}

fn file_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn backup_name(stamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}.{}{}", BASE_CONFIG_FILE, stamp, BACKUP_SUFFIX)
    } else {
        format!("{}.{}.{}{}", BASE_CONFIG_FILE, stamp, attempt, BACKUP_SUFFIX)
    }
}

impl ConfigStore {
    /// Snapshot the current base config bytes.
    ///
    /// Returns `None` when there is no base config to snapshot.
    pub fn backup_base(&self, at: DateTime<Local>) -> ProfileResult<Option<PathBuf>> {
        let base_path = self.layout.base_config();
        let bytes = match fs::read(&base_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ProfileError::io(base_path, e)),
        };
        let permissions =
            existing_permissions(&base_path).map_err(|e| ProfileError::io(&base_path, e))?;
        let digest = file_digest(&bytes);
        let stamp = backup_timestamp(at);
        let dir = self.layout.config_dir();

        for attempt in 0..MAX_COLLISION_SUFFIX {
            let candidate = dir.join(backup_name(&stamp, attempt));
            match write_new(&candidate, &bytes, permissions.clone()) {
                Ok(()) => {
                    info!(backup = %candidate.display(), digest = %digest, "backed up base config");
                    return Ok(Some(candidate));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    let existing = fs::read(&candidate).map_err(|e| ProfileError::io(&candidate, e))?;
                    if file_digest(&existing) == digest {
                        debug!(backup = %candidate.display(), "identical snapshot already present");
                        return Ok(Some(candidate));
                    }
                }
                Err(e) => return Err(ProfileError::io(candidate, e)),
            }
        }

        Err(ProfileError::io(
            dir,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("too many snapshots for {}", stamp),
            ),
        ))
    }

    /// All snapshots, oldest first
    pub fn list_backups(&self) -> ProfileResult<Vec<PathBuf>> {
        let dir = self.layout.config_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ProfileError::io(dir, e)),
        };

        let prefix = format!("{}.", BASE_CONFIG_FILE);
        let mut backups: Vec<(String, u32, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                let middle = name.strip_prefix(&prefix)?.strip_suffix(BACKUP_SUFFIX)?;
                let (stamp, attempt) = match middle.split_once('.') {
                    Some((stamp, n)) => (stamp.to_string(), n.parse::<u32>().ok()?),
                    None => (middle.to_string(), 0),
                };
                Some((stamp, attempt, entry.path()))
            })
            .collect();
        backups.sort();

        Ok(backups.into_iter().map(|(_, _, path)| path).collect())
    }
}

/// Create `path` exclusively; fails with `AlreadyExists` if it is taken
fn write_new(path: &Path, bytes: &[u8], permissions: Option<Permissions>) -> io::Result<()> {
    use std::io::Write;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}
