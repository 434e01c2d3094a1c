//! Gateway profile switcher
//!
//! Keeps the agent gateway's config as a shared base plus named model
//! profiles. Switching a profile first folds any hand edits of the active
//! config back into the base (with a snapshot), then regenerates the active
//! config from base + profile and replaces it atomically.

pub mod defaults;
pub mod error;
pub mod gateway;
pub mod init;
pub mod reconcile;
pub mod settings;
pub mod status;
pub mod store;
pub mod switch;

pub use error::{ProfileError, ProfileResult};
pub use gateway::{GatewayProbe, TcpGatewayProbe};
pub use init::{initialize, InitReport};
pub use reconcile::{sync, SyncOutcome};
pub use settings::Settings;
pub use status::{list_profiles, status, ProfileSummary, StatusReport};
pub use store::{ConfigStore, ProfileEntry, StoreLayout};
pub use switch::{switch_profile, SwitchReport};
