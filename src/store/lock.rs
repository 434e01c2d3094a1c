//! Advisory store lock
//!
//! Serializes reconcile + commit sequences across concurrent invocations on
//! the same store. Readers do not take it. Released on drop.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{ProfileError, ProfileResult};

/// Exclusive advisory lock on a store's config directory
#[derive(Debug)]
pub struct StoreLock {
    lock_path: PathBuf,
    lock_file: File,
}

impl StoreLock {
    /// Lock file name inside the config directory
    pub const LOCK_FILENAME: &'static str = ".profiles.lock";

    /// Acquire the lock, waiting up to `timeout`.
    ///
    /// Creates the config directory and lock file if they don't exist.
    pub fn acquire(config_dir: &Path, timeout: Duration) -> ProfileResult<Self> {
        fs::create_dir_all(config_dir).map_err(|e| ProfileError::io(config_dir, e))?;

        let lock_path = config_dir.join(Self::LOCK_FILENAME);
        let start = Instant::now();
        let poll_interval = Duration::from_millis(50);
        let mut warned = false;

        loop {
            match Self::try_acquire_exclusive(&lock_path) {
                Ok(lock_file) => {
                    if warned {
                        warn!(
                            lock = %lock_path.display(),
                            waited_secs = start.elapsed().as_secs_f64(),
                            "store lock acquired after contention"
                        );
                    } else {
                        debug!(lock = %lock_path.display(), "store lock acquired");
                    }
                    return Ok(Self {
                        lock_path,
                        lock_file,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if !warned && start.elapsed() > Duration::from_millis(500) {
                        warn!(lock = %lock_path.display(), "store lock held by another process, waiting");
                        warned = true;
                    }
                }
                Err(e) => return Err(ProfileError::io(lock_path, e)),
            }

            if start.elapsed() >= timeout {
                return Err(ProfileError::LockTimeout {
                    path: lock_path,
                    waited: timeout,
                });
            }

            std::thread::sleep(poll_interval);
        }
    }

    #[cfg(unix)]
    fn try_acquire_exclusive(lock_path: &Path) -> io::Result<File> {
        use std::os::unix::fs::OpenOptionsExt;
        use std::os::unix::io::AsRawFd;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o644)
            .open(lock_path)?;

        // SAFETY: the fd is owned by `file` and stays open for the call
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };

        if result == 0 {
            Ok(file)
        } else {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
                Err(io::Error::new(io::ErrorKind::WouldBlock, "lock held"))
            } else {
                Err(err)
            }
        }
    }

    // Non-unix fallback: lock file existence is the lock, removed on drop
    #[cfg(not(unix))]
    fn try_acquire_exclusive(lock_path: &Path) -> io::Result<File> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock_path)
        {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(io::Error::new(io::ErrorKind::WouldBlock, "lock held"))
            }
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            // SAFETY: the fd is still owned by `lock_file`
            unsafe {
                libc::flock(self.lock_file.as_raw_fd(), libc::LOCK_UN);
            }
        }
        #[cfg(not(unix))]
        {
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}
