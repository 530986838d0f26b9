// # State Store Trait
//
// Defines the interface for persistent state management.
//
// ## Purpose
//
// The state store is what makes repeated ticks idempotent: it remembers the
// IP the last update attempt was issued for, so an unchanged IP never
// reaches the provider twice. It also holds the two operator documents —
// the credential profile and the notification settings — in storage that
// survives between ticks.
//
// ## Contract
//
// - Loading state that was never written yields the explicit first-run
//   value, not an error.
// - A document that exists but cannot be parsed is `Error::CorruptState`;
//   the reconciler downgrades that to first-run with a warning.
// - Writes are atomic with respect to process crash: either the old or the
//   new document is observable on the next load, never a partial write.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::profile::CredentialProfile;
use crate::traits::notifier::NotificationSettings;

/// Per-run persisted facts
///
/// `last_ip` records the IP of the last *attempted* update, successful or
/// not, so a permanently failing provider does not produce one update
/// attempt per tick for the same address. `None` means no update has ever
/// been attempted — first run, a distinct lifecycle state rather than an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunState {
    /// IP submitted by the most recent update attempt
    pub last_ip: Option<IpAddr>,

    /// When that attempt was made
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl RunState {
    /// State recording an update attempt for `ip`, stamped now
    pub fn attempted(ip: IpAddr) -> Self {
        Self {
            last_ip: Some(ip),
            updated_at: Some(chrono::Utc::now()),
        }
    }
}

/// Trait for state store implementations
///
/// Implementations must be safe to share across the components of one tick.
/// There is no cross-process locking here: concurrent invocations are the
/// scheduler's problem, and atomic single-document writes are the only
/// guarantee the store contributes.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the per-run state
    ///
    /// # Returns
    ///
    /// - `Ok(RunState)`: The stored state, or `RunState::default()` when
    ///   none has ever been written
    /// - `Err(Error::CorruptState)`: A document exists but cannot be parsed
    async fn load_state(&self) -> Result<RunState, crate::Error>;

    /// Persist the per-run state
    async fn save_state(&self, state: &RunState) -> Result<(), crate::Error>;

    /// Load the credential profile
    ///
    /// # Returns
    ///
    /// - `Ok(Some(profile))`: A profile is stored
    /// - `Ok(None)`: No profile has been created yet
    /// - `Err(Error::CorruptState)`: A document exists but cannot be parsed
    async fn load_profile(&self) -> Result<Option<CredentialProfile>, crate::Error>;

    /// Persist the credential profile, replacing any existing one
    async fn save_profile(&self, profile: &CredentialProfile) -> Result<(), crate::Error>;

    /// Delete the credential profile
    ///
    /// Deleting an absent profile is not an error.
    async fn delete_profile(&self) -> Result<(), crate::Error>;

    /// Load the notification settings, defaulting when none are stored
    async fn load_settings(&self) -> Result<NotificationSettings, crate::Error>;

    /// Persist the notification settings
    async fn save_settings(&self, settings: &NotificationSettings) -> Result<(), crate::Error>;
}
