// # Memory State Store
//
// In-memory implementation of StateStore.
//
// Nothing survives the process: every run is a first run, and the first
// reconciliation after a restart issues one (harmless) update. Useful for
// tests and for ephemeral deployments where that behavior is acceptable.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::profile::CredentialProfile;
use crate::traits::notifier::NotificationSettings;
use crate::traits::state_store::{RunState, StateStore};

#[derive(Debug, Default)]
struct Inner {
    state: RunState,
    profile: Option<CredentialProfile>,
    settings: NotificationSettings,
}

/// In-memory state store implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the stored profile (test convenience)
    pub async fn with_profile(self, profile: CredentialProfile) -> Self {
        self.inner.write().await.profile = Some(profile);
        self
    }

    /// Pre-seed the stored run state (test convenience)
    pub async fn with_state(self, state: RunState) -> Self {
        self.inner.write().await.state = state;
        self
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load_state(&self) -> Result<RunState, Error> {
        Ok(self.inner.read().await.state.clone())
    }

    async fn save_state(&self, state: &RunState) -> Result<(), Error> {
        self.inner.write().await.state = state.clone();
        Ok(())
    }

    async fn load_profile(&self) -> Result<Option<CredentialProfile>, Error> {
        Ok(self.inner.read().await.profile.clone())
    }

    async fn save_profile(&self, profile: &CredentialProfile) -> Result<(), Error> {
        self.inner.write().await.profile = Some(profile.clone());
        Ok(())
    }

    async fn delete_profile(&self) -> Result<(), Error> {
        self.inner.write().await.profile = None;
        Ok(())
    }

    async fn load_settings(&self) -> Result<NotificationSettings, Error> {
        Ok(self.inner.read().await.settings.clone())
    }

    async fn save_settings(&self, settings: &NotificationSettings) -> Result<(), Error> {
        self.inner.write().await.settings = settings.clone();
        Ok(())
    }
}
