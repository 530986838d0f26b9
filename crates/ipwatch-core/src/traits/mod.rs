//! Core traits for the reconciliation system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Fetch the current external IP address
//! - [`ProviderClient`]: Issue the dynamic-DNS update request
//! - [`StateStore`]: Persistent state management for idempotency
//! - [`Notifier`]: Success/failure notification delivery
//! - [`CredentialPrompt`]: Operator-driven credential re-entry

pub mod credentials;
pub mod ip_resolver;
pub mod notifier;
pub mod provider_client;
pub mod state_store;

pub use credentials::{CredentialPrompt, DeclinePrompt, ReentryReason};
pub use ip_resolver::IpResolver;
pub use notifier::{Notification, NotificationPreference, NotificationSettings, Notifier};
pub use provider_client::{ProviderClient, UpdateOutcome};
pub use state_store::{RunState, StateStore};
