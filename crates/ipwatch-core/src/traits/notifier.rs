// # Notifier Trait
//
// Defines the interface for owner notification delivery.
//
// The core produces exactly two message shapes — update succeeded, update
// failed — and hands them to whatever transport the binary wires in.
// Delivery failures are the one error class that is never escalated: a
// notification that cannot be sent is logged and forgotten, because it must
// not block state persistence or change the tick's exit status.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A notification ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// The message sent after a successful update
    pub fn success(recipient: impl Into<String>, domain: &str, ip: std::net::IpAddr) -> Self {
        Self {
            recipient: recipient.into(),
            subject: "IP CHANGED SUCCESSFULLY!".to_string(),
            body: format!("IP for {} has changed! New IP: {}", domain, ip),
        }
    }

    /// The message sent after a failed update
    pub fn failure(
        recipient: impl Into<String>,
        domain: &str,
        ip: std::net::IpAddr,
        error: &str,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: "IP CHANGE FAILED!".to_string(),
            body: format!(
                "IP for {} has changed but the API call failed ({})! New IP: {}",
                domain, error, ip
            ),
        }
    }
}

/// Which events the owner wants to hear about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPreference {
    /// Successes and failures
    #[default]
    All,
    /// Failures only
    ErrorsOnly,
    /// Nothing
    None,
}

impl NotificationPreference {
    /// Step to the next preference, for the toggle command
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::ErrorsOnly,
            Self::ErrorsOnly => Self::None,
            Self::None => Self::All,
        }
    }

    /// Human-readable label, used in toggle-command logs
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all changes",
            Self::ErrorsOnly => "errors only",
            Self::None => "none",
        }
    }

    pub fn wants_success(self) -> bool {
        matches!(self, Self::All)
    }

    pub fn wants_errors(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Notification settings, mutable independently of the credential profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub preference: NotificationPreference,

    /// Where notifications go; `None` disables delivery regardless of
    /// preference
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Trait for notification delivery implementations
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification, best-effort
    async fn send(&self, notification: &Notification) -> Result<(), crate::Error>;
}
