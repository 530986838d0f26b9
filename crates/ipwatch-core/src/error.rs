//! Error types for the reconciliation core
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciliation system
///
/// Provider-side failures (bad host, bad credentials, connection drops) are
/// NOT errors: they are [`crate::traits::UpdateOutcome`] values the
/// reconciler switches on. Only failures of the machinery itself live here.
#[derive(Error, Debug)]
pub enum Error {
    /// The external IP could not be resolved; nothing useful can be done
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// A persisted document exists but cannot be parsed
    #[error("corrupt state: {0}")]
    CorruptState(String),

    /// State store-related errors
    #[error("state store error: {0}")]
    StateStore(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider client plumbing errors (malformed endpoint, not outcomes)
    #[error("provider error: {0}")]
    Provider(String),

    /// Notification delivery errors (logged as warnings, never escalated)
    #[error("notification error: {0}")]
    Notification(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a network-unavailable error
    pub fn network_unavailable(msg: impl Into<String>) -> Self {
        Self::NetworkUnavailable(msg.into())
    }

    /// Create a corrupt-state error
    pub fn corrupt_state(msg: impl Into<String>) -> Self {
        Self::CorruptState(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider plumbing error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
