//! Log-backed notifier
//!
//! Delivery transport is deployment-specific (mail relay, webhook, a
//! pager); the stock binary records notifications in the structured log
//! and leaves transports to custom builds wiring their own
//! [`Notifier`] implementation into the reconciler.

use async_trait::async_trait;
use ipwatch_core::traits::{Notification, Notifier};
use ipwatch_core::Result;
use tracing::info;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        info!(
            "notification for {}: {} | {}",
            notification.recipient, notification.subject, notification.body
        );
        Ok(())
    }
}
