//! On-disk profile store
//!
//! ```text
//! <root>/
//!   active-config.json            active config read by the gateway
//!   config/
//!     base.json                   shared base config
//!     base.json.<ts>.bak          base snapshots, append-only
//!     .current-model              last applied profile name
//!     .profiles.lock              advisory lock
//!     models/<profile>.json       profile overlays
//! ```
//!
//! The store root is always injected; nothing here reads the environment.

mod atomic;
mod backup;
mod lock;
mod profiles;

pub use atomic::write_atomic;
pub use backup::{backup_timestamp, BACKUP_SUFFIX};
pub use lock::StoreLock;
pub use profiles::ProfileEntry;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{ProfileError, ProfileResult};

/// Active config file name under the root
pub const ACTIVE_CONFIG_FILE: &str = "active-config.json";

/// Base config file name under `config/`
pub const BASE_CONFIG_FILE: &str = "base.json";

/// Current profile marker under `config/`
pub const CURRENT_PROFILE_FILE: &str = ".current-model";

/// Default time to wait for the store lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Paths of every file the store manages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    /// Create a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn active_config(&self) -> PathBuf {
        self.root.join(ACTIVE_CONFIG_FILE)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn base_config(&self) -> PathBuf {
        self.config_dir().join(BASE_CONFIG_FILE)
    }

    pub fn current_profile(&self) -> PathBuf {
        self.config_dir().join(CURRENT_PROFILE_FILE)
    }

    pub fn models_dir(&self) -> PathBuf {
        self.config_dir().join("models")
    }

    /// Overlay path for a profile name
    pub fn profile(&self, name: &str) -> PathBuf {
        self.models_dir().join(format!("{}.json", name))
    }
}

/// Read/write access to the documents of one store
#[derive(Debug, Clone)]
pub struct ConfigStore {
    layout: StoreLayout,
    lock_timeout: Duration,
}

impl ConfigStore {
    /// Open the store at `root`. Nothing is created until a write happens.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: StoreLayout::new(root),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override how long to wait for the store lock
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Take the exclusive store lock for a read-modify-write sequence
    pub fn lock(&self) -> ProfileResult<StoreLock> {
        StoreLock::acquire(&self.layout.config_dir(), self.lock_timeout)
    }

    /// Load the active config, `None` if it does not exist
    pub fn load_active(&self) -> ProfileResult<Option<Value>> {
        read_document(&self.layout.active_config())
    }

    /// Load the base config, `None` if it does not exist
    pub fn load_base(&self) -> ProfileResult<Option<Value>> {
        read_document(&self.layout.base_config())
    }

    /// Replace the base config atomically
    pub fn save_base(&self, base: &Value) -> ProfileResult<()> {
        let path = self.layout.base_config();
        write_document(&path, base)?;
        debug!(path = %path.display(), "wrote base config");
        Ok(())
    }

    /// Replace the active config atomically
    pub fn commit_active(&self, active: &Value) -> ProfileResult<()> {
        let path = self.layout.active_config();
        write_document(&path, active)?;
        debug!(path = %path.display(), "committed active config");
        Ok(())
    }

    /// Name of the last applied profile, if any
    pub fn current_profile(&self) -> ProfileResult<Option<String>> {
        let path = self.layout.current_profile();
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let name = contents.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProfileError::io(path, e)),
        }
    }

    /// Record the last applied profile
    pub fn set_current_profile(&self, name: &str) -> ProfileResult<()> {
        let path = self.layout.current_profile();
        ensure_parent(&path)?;
        fs::write(&path, format!("{}\n", name)).map_err(|e| ProfileError::io(&path, e))
    }
}

/// Read and parse a JSON document, `None` if the file does not exist
pub fn read_document(path: &Path) -> ProfileResult<Option<Value>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ProfileError::io(path, e)),
    };
    let value = serde_json::from_slice(&bytes).map_err(|e| ProfileError::parse(path, e))?;
    Ok(Some(value))
}

/// Serialize a document as pretty JSON and write it atomically
pub fn write_document(path: &Path, value: &Value) -> ProfileResult<()> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| ProfileError::GenerationFailed(format!("{}: {}", path.display(), e)))?;
    json.push('\n');
    ensure_parent(path)?;
    write_atomic(path, json.as_bytes())
}

fn ensure_parent(path: &Path) -> ProfileResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ProfileError::io(parent, e))
        }
        _ => Ok(()),
    }
}
