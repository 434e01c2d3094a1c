//! Profile overlay documents under `config/models/`

use std::fs;
use std::io;
use std::path::PathBuf;

use profile_merge::ProfileOverlay;
use tracing::warn;

use super::ConfigStore;
use crate::error::{ProfileError, ProfileResult};

/// A profile overlay together with the name it is stored under
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    /// File stem under `config/models/`, used to select the profile
    pub id: String,

    /// Parsed overlay document
    pub overlay: ProfileOverlay,
}

impl ProfileEntry {
    /// Display name, falling back to the id when the overlay has none
    pub fn display_name(&self) -> &str {
        if self.overlay.name.trim().is_empty() {
            &self.id
        } else {
            &self.overlay.name
        }
    }
}

/// Whether `name` can name a file directly inside the models directory
fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && name != ".."
}

impl ConfigStore {
    /// Ids of all stored profiles, sorted
    pub fn profile_ids(&self) -> ProfileResult<Vec<String>> {
        let dir = self.layout.models_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ProfileError::io(dir, e)),
        };

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .filter(|id| is_valid_profile_name(id))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Load one profile.
    ///
    /// A missing overlay is `ProfileNotFound` carrying the available ids; a
    /// malformed one is a parse error.
    pub fn load_profile(&self, name: &str) -> ProfileResult<ProfileEntry> {
        let path = self.layout.profile(name);
        let bytes = if is_valid_profile_name(name) {
            match fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                Err(e) => return Err(ProfileError::io(path, e)),
            }
        } else {
            None
        };

        let Some(bytes) = bytes else {
            return Err(ProfileError::ProfileNotFound {
                name: name.to_string(),
                available: self.profile_ids()?,
            });
        };

        let overlay = ProfileOverlay::from_slice(&bytes).map_err(|e| ProfileError::parse(&path, e))?;
        Ok(ProfileEntry {
            id: name.to_string(),
            overlay,
        })
    }

    /// Load every readable profile, sorted by id.
    ///
    /// Malformed overlays are skipped with a warning so one bad file does not
    /// hide the rest.
    pub fn list_profiles(&self) -> ProfileResult<Vec<ProfileEntry>> {
        let mut profiles = Vec::new();
        for id in self.profile_ids()? {
            match self.load_profile(&id) {
                Ok(entry) => profiles.push(entry),
                Err(e) => warn!(profile = %id, error = %e, "skipping unreadable profile"),
            }
        }
        Ok(profiles)
    }

    /// Write an overlay unless a profile with that id already exists.
    ///
    /// Returns whether the file was written.
    pub fn install_profile(&self, id: &str, overlay: &ProfileOverlay) -> ProfileResult<bool> {
        let path: PathBuf = self.layout.profile(id);
        if path.exists() {
            return Ok(false);
        }
        let mut json = overlay
            .to_json()
            .map_err(|e| ProfileError::GenerationFailed(format!("{}: {}", path.display(), e)))?;
        json.push('\n');
        fs::create_dir_all(self.layout.models_dir())
            .map_err(|e| ProfileError::io(self.layout.models_dir(), e))?;
        fs::write(&path, json).map_err(|e| ProfileError::io(&path, e))?;
        Ok(true)
    }
}
