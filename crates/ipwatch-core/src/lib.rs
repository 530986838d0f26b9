// # ipwatch-core
//
// Core library for the ipwatch reconciliation state machine.
//
// ## Architecture Overview
//
// This library provides the logic that keeps a dynamic-DNS record in sync
// with a host's public IP address, one tick at a time:
// - **IpResolver**: Trait for fetching the current external IP
// - **ProviderClient**: Trait for issuing the dyndns2 update request
// - **StateStore**: Trait for persistent state management (idempotency)
// - **Notifier**: Trait for success/failure notification delivery
// - **CredentialPrompt**: Trait for operator-driven credential re-entry
// - **Reconciler**: State machine that orchestrates one reconciliation tick
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Tick-Driven**: One invocation performs exactly one reconciliation
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Idempotency**: State management ensures safe, repeatable ticks

pub mod config;
pub mod error;
pub mod profile;
pub mod reconciler;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{ProviderConfig, ResolverConfig, StoreConfig};
pub use error::{Error, Result};
pub use profile::CredentialProfile;
pub use reconciler::{Reconciler, TickReport};
pub use state::{FileStore, MemoryStore};
pub use traits::{
    CredentialPrompt, DeclinePrompt, IpResolver, Notification, NotificationPreference,
    NotificationSettings, Notifier, ProviderClient, ReentryReason, RunState, StateStore,
    UpdateOutcome,
};
