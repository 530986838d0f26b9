//! Core reconciliation state machine
//!
//! The Reconciler is responsible for:
//! - Resolving the current external IP via IpResolver
//! - Checking persisted state for idempotency
//! - Updating the DNS record via ProviderClient
//! - Classifying the outcome and driving recovery
//! - Persisting state and notifying the owner
//!
//! ## Tick Flow
//!
//! ```text
//! Idle → Resolving → Comparing ──────────────→ NoOpDone
//!                        │ (differs / first run)
//!                        ▼
//!                    Updating → Interpreting ──→ Done
//!                        ▲           │
//!                        └── Recovering (credential re-entry)
//! ```
//!
//! One tick per process invocation. There is no internal retry loop: a
//! transient provider failure is recorded and left to the next scheduled
//! tick, and the only way an update is re-attempted within a tick is an
//! operator supplying replacement credentials.

use std::net::IpAddr;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::traits::{
    CredentialPrompt, IpResolver, Notification, NotificationSettings, Notifier, ProviderClient,
    ReentryReason, RunState, StateStore, UpdateOutcome,
};

/// Operator-facing explanation of a `BadHost` outcome
///
/// This is a durable configuration error: the tick cannot succeed until the
/// domain itself is fixed at the provider.
const BAD_HOST_DETAIL: &str = "the hostname does not exist, is not a fully qualified \
     domain name, or does not have dynamic DNS enabled";

/// Terminal result of one reconciliation tick
///
/// The binary maps these to exit codes; the core only names what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickReport {
    /// Current IP equals the persisted IP; nothing was done
    NoChange { ip: IpAddr },

    /// The provider accepted the new IP (or already had it)
    Updated { ip: IpAddr },

    /// Durable configuration error; the profile was kept
    BadHost { ip: IpAddr },

    /// Credentials rejected and re-entry declined; the profile was deleted
    AuthFailed { ip: IpAddr },

    /// No response from the provider; the next tick will retry
    TransientFailure { ip: IpAddr, detail: String },
}

impl TickReport {
    /// Whether the tick ended in a state that needs no attention
    pub fn is_success(&self) -> bool {
        matches!(self, Self::NoChange { .. } | Self::Updated { .. })
    }
}

/// The reconciliation state machine
///
/// Owns one implementation of each collaborator trait and drives them
/// strictly in sequence. The resolved IP is passed explicitly through the
/// tick; there is no shared "current IP" state anywhere.
pub struct Reconciler {
    resolver: Box<dyn IpResolver>,
    provider: Box<dyn ProviderClient>,
    store: Box<dyn StateStore>,
    notifier: Box<dyn Notifier>,
    prompt: Box<dyn CredentialPrompt>,
}

impl Reconciler {
    /// Create a reconciler from its collaborators
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn ProviderClient>,
        store: Box<dyn StateStore>,
        notifier: Box<dyn Notifier>,
        prompt: Box<dyn CredentialPrompt>,
    ) -> Self {
        Self {
            resolver,
            provider,
            store,
            notifier,
            prompt,
        }
    }

    /// Run one reconciliation tick
    ///
    /// # Errors
    ///
    /// - `Error::NetworkUnavailable`: the external IP could not be resolved.
    ///   Nothing has been persisted and no provider call was made.
    /// - `Error::Config`: no credential profile is stored.
    /// - Store write failures propagate as `Error::StateStore`.
    ///
    /// Provider-side failures are not errors; they terminate the tick with
    /// the matching [`TickReport`] variant.
    pub async fn run_tick(&self) -> Result<TickReport> {
        // Resolving: without the network there is nothing useful to do
        let current = self.resolver.resolve().await?;
        debug!("resolved external IP: {}", current);

        // Comparing: corrupt state is recovered as first-run, availability
        // over strictness
        let state = match self.store.load_state().await {
            Ok(state) => state,
            Err(Error::CorruptState(detail)) => {
                warn!("state unreadable, treating as first run: {}", detail);
                RunState::default()
            }
            Err(e) => return Err(e),
        };

        if state.last_ip == Some(current) {
            info!("current IP: {} (no change)", current);
            return Ok(TickReport::NoChange { ip: current });
        }

        match state.last_ip {
            Some(previous) => info!("IP changed: {} -> {}", previous, current),
            None => info!("no previous IP recorded, updating for {}", current),
        }

        let profile = match self.store.load_profile().await {
            Ok(profile) => profile,
            Err(Error::CorruptState(detail)) => {
                warn!("profile unreadable: {}", detail);
                None
            }
            Err(e) => return Err(e),
        };
        let Some(mut profile) = profile else {
            return Err(Error::config(
                "no credential profile stored; create one before reconciling",
            ));
        };

        let settings = match self.store.load_settings().await {
            Ok(settings) => settings,
            Err(Error::CorruptState(detail)) => {
                warn!("settings unreadable, using defaults: {}", detail);
                NotificationSettings::default()
            }
            Err(e) => return Err(e),
        };

        // Updating / Interpreting / Recovering. The loop re-enters only
        // when the operator supplies replacement credentials.
        loop {
            let outcome = self.provider.update(&profile, current).await?;
            debug!("update outcome: {:?}", outcome);

            match outcome {
                UpdateOutcome::Success | UpdateOutcome::NoChange => {
                    self.store.save_state(&RunState::attempted(current)).await?;
                    info!("newly recorded IP for {}: {}", profile.domain, current);
                    self.notify_success(&settings, &profile.domain, current)
                        .await;
                    return Ok(TickReport::Updated { ip: current });
                }

                UpdateOutcome::BadHost => {
                    warn!("update rejected for {}: {}", profile.domain, BAD_HOST_DETAIL);
                    match self.prompt.reenter(ReentryReason::BadHost, &profile).await? {
                        Some(new_profile) => {
                            self.store.save_profile(&new_profile).await?;
                            info!("credential profile recreated, re-attempting update");
                            profile = new_profile;
                        }
                        None => {
                            self.store.save_state(&RunState::attempted(current)).await?;
                            self.notify_failure(&settings, &profile.domain, current, BAD_HOST_DETAIL)
                                .await;
                            return Ok(TickReport::BadHost { ip: current });
                        }
                    }
                }

                UpdateOutcome::AuthFailure => {
                    warn!("could not authenticate with the stored credentials");
                    match self
                        .prompt
                        .reenter(ReentryReason::AuthFailure, &profile)
                        .await?
                    {
                        Some(new_profile) => {
                            self.store.save_profile(&new_profile).await?;
                            info!("credential profile recreated, re-attempting update");
                            profile = new_profile;
                        }
                        None => {
                            self.store.delete_profile().await?;
                            self.store.save_state(&RunState::attempted(current)).await?;
                            warn!("API authentication failed, credential profile deleted");
                            return Ok(TickReport::AuthFailed { ip: current });
                        }
                    }
                }

                UpdateOutcome::TransientError(detail) => {
                    warn!("connection error talking to the provider: {}", detail);
                    self.store.save_state(&RunState::attempted(current)).await?;
                    self.notify_failure(&settings, &profile.domain, current, &detail)
                        .await;
                    return Ok(TickReport::TransientFailure {
                        ip: current,
                        detail,
                    });
                }
            }
        }
    }

    /// Best-effort success notification, gated by preference
    async fn notify_success(&self, settings: &NotificationSettings, domain: &str, ip: IpAddr) {
        if !settings.preference.wants_success() {
            return;
        }
        let Some(recipient) = settings.recipient.as_deref() else {
            debug!("no notification recipient configured");
            return;
        };
        let notification = Notification::success(recipient, domain, ip);
        if let Err(e) = self.notifier.send(&notification).await {
            warn!("notification not sent: {}", e);
        }
    }

    /// Best-effort failure notification, gated by preference
    async fn notify_failure(
        &self,
        settings: &NotificationSettings,
        domain: &str,
        ip: IpAddr,
        detail: &str,
    ) {
        if !settings.preference.wants_errors() {
            return;
        }
        let Some(recipient) = settings.recipient.as_deref() else {
            debug!("no notification recipient configured");
            return;
        };
        let notification = Notification::failure(recipient, domain, ip, detail);
        if let Err(e) = self.notifier.send(&notification).await {
            warn!("notification not sent: {}", e);
        }
    }
}
