//! Runtime settings resolved from the environment
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `GWPROFILE_ROOT` | store root | `$HOME/.openclaw` |
//! | `GWPROFILE_PROFILE` | profile applied when no argument is given | unset |
//! | `GWPROFILE_GATEWAY_PORT` | gateway port probed after a switch | `18789` |

use std::path::PathBuf;

use crate::error::{ProfileError, ProfileResult};

/// Store root override
pub const ROOT_ENV: &str = "GWPROFILE_ROOT";

/// Profile auto-applied when no argument is given
pub const PROFILE_ENV: &str = "GWPROFILE_PROFILE";

/// Gateway port override
pub const GATEWAY_PORT_ENV: &str = "GWPROFILE_GATEWAY_PORT";

/// Default store location relative to `$HOME`
pub const DEFAULT_ROOT_DIR: &str = ".openclaw";

/// Port the gateway listens on by default
pub const DEFAULT_GATEWAY_PORT: u16 = 18789;

/// Resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Store root directory
    pub root: PathBuf,

    /// Profile to apply when the CLI gets no argument
    pub default_profile: Option<String>,

    /// Port probed to detect a running gateway
    pub gateway_port: u16,
}

impl Settings {
    /// Resolve settings from the process environment
    pub fn from_env(root_override: Option<PathBuf>) -> ProfileResult<Self> {
        Self::resolve(root_override, |name| std::env::var(name).ok())
    }

    /// Resolve settings with an explicit variable lookup.
    ///
    /// `root_override` (the `--root` flag) wins over `GWPROFILE_ROOT`, which
    /// wins over `$HOME/.openclaw`. Empty values count as unset.
    pub fn resolve<F>(root_override: Option<PathBuf>, lookup: F) -> ProfileResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let root = match root_override {
            Some(root) => root,
            None => match var(ROOT_ENV) {
                Some(root) => PathBuf::from(root),
                None => {
                    let home = var("HOME").ok_or_else(|| {
                        ProfileError::DependencyMissing(format!(
                            "HOME is not set; set {} or pass --root",
                            ROOT_ENV
                        ))
                    })?;
                    PathBuf::from(home).join(DEFAULT_ROOT_DIR)
                }
            },
        };

        let gateway_port = match var(GATEWAY_PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ProfileError::InvalidSetting {
                    name: GATEWAY_PORT_ENV.to_string(),
                    value: raw.clone(),
                })?,
            None => DEFAULT_GATEWAY_PORT,
        };

        Ok(Self {
            root,
            default_profile: var(PROFILE_ENV),
            gateway_port,
        })
    }
}
