//! Interactive stdin prompts
//!
//! Everything here blocks on the terminal, which is fine: a tick is one
//! sequential pass, and prompts only ever run in attended invocations.

use std::io::Write;

use async_trait::async_trait;
use ipwatch_core::traits::{CredentialPrompt, ReentryReason};
use ipwatch_core::{CredentialProfile, NotificationPreference, NotificationSettings, Result};
use tracing::warn;

/// Print `question` and read one trimmed line from stdin
fn ask(question: &str) -> Result<String> {
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Walk the operator through creating a credential profile
pub fn collect_profile(provider_host: &str) -> Result<CredentialProfile> {
    let domain = ask("What's your domain? (example.com / subdomain.example.com): ")?;
    let username = ask("What's your autogenerated update username?: ")?;
    let secret = ask("What's your autogenerated update password?: ")?;

    CredentialProfile::new(domain, username, secret, provider_host)
}

/// Walk the operator through the notification settings
pub fn collect_settings() -> Result<NotificationSettings> {
    let choice = ask("Enable notifications? [Y]all(default); [e]errors only; [n]no: ")?;
    let preference = match choice.to_lowercase().as_str() {
        "e" => NotificationPreference::ErrorsOnly,
        "n" => NotificationPreference::None,
        _ => NotificationPreference::All,
    };

    let recipient = if matches!(preference, NotificationPreference::None) {
        None
    } else {
        let address = ask("Where should notifications go? (address): ")?;
        if address.is_empty() { None } else { Some(address) }
    };

    Ok(NotificationSettings {
        preference,
        recipient,
    })
}

/// Stdin-backed credential re-entry
pub struct InteractivePrompt {
    provider_host: String,
}

impl InteractivePrompt {
    pub fn new(provider_host: impl Into<String>) -> Self {
        Self {
            provider_host: provider_host.into(),
        }
    }
}

#[async_trait]
impl CredentialPrompt for InteractivePrompt {
    async fn reenter(
        &self,
        reason: ReentryReason,
        current: &CredentialProfile,
    ) -> Result<Option<CredentialProfile>> {
        match reason {
            ReentryReason::BadHost => {
                eprintln!(
                    "The domain '{}' does not exist, is not a fully qualified domain name, \
                     or does not have dynamic DNS enabled. Updates cannot succeed until the \
                     domain configuration is fixed at the provider.",
                    current.domain
                );
            }
            ReentryReason::AuthFailure => {
                eprintln!("The provider rejected the stored credentials.");
            }
        }

        if ask("Recreate the API profile? (Y/n): ")?.to_lowercase() == "n" {
            return Ok(None);
        }

        match collect_profile(&self.provider_host) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("invalid profile input: {}", e);
                Ok(None)
            }
        }
    }
}
