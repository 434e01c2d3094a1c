//! Write-then-rename file replacement
//!
//! The temp file lives in the target's directory so the final `rename` stays
//! on one filesystem and readers only ever see the old or the new contents.
//! A replaced file keeps its permissions.

use std::fs::{self, File, Permissions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{ProfileError, ProfileResult};

/// Atomically replace `path` with `bytes`
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ProfileResult<()> {
    let permissions = existing_permissions(path).map_err(|e| ProfileError::io(path, e))?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let written = File::create(&temp_path)
        .and_then(|mut file| {
            if let Some(permissions) = permissions {
                file.set_permissions(permissions)?;
            }
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(ProfileError::io(path, e));
    }

    Ok(())
}

/// Permissions of `path`, `None` if it does not exist yet
pub(crate) fn existing_permissions(path: &Path) -> io::Result<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leftover_temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_write_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("active-config.json");

        write_atomic(&path, b"{}\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"{}\n");
        assert!(leftover_temp_files(temp.path()).is_empty());
    }

    #[test]
    fn test_write_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("active-config.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(leftover_temp_files(temp.path()).is_empty());
    }

    #[test]
    fn test_failed_rename_leaves_target_and_no_temp() {
        let temp = TempDir::new().unwrap();
        // A directory in place of the target makes the rename fail
        let path = temp.path().join("target");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_atomic(&path, b"data").is_err());

        assert!(path.join("keep").exists());
        assert!(leftover_temp_files(temp.path()).is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_replace_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("active-config.json");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(0o600)).unwrap();

        write_atomic(&path, b"new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
