// # Credential Re-entry Trait
//
// Expresses the "recreate the API profile?" recovery interaction as a
// callback the reconciler invokes, instead of an input loop buried in the
// failure branch. An interactive binary wires in a stdin prompt; an
// unattended deployment substitutes [`DeclinePrompt`] and every offer is
// refused, which turns both recovery branches into their terminal paths.

use async_trait::async_trait;

use crate::profile::CredentialProfile;

/// Why the reconciler is offering credential re-entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReentryReason {
    /// The provider reported the domain as ineligible (`nohost`/`notfqdn`)
    BadHost,
    /// The provider rejected the credentials
    AuthFailure,
}

/// Trait for operator-driven credential re-entry
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    /// Offer the operator a chance to supply a replacement profile
    ///
    /// # Returns
    ///
    /// - `Ok(Some(profile))`: A new profile to save and retry with
    /// - `Ok(None)`: Declined; the reconciler takes the terminal path for
    ///   `reason`
    async fn reenter(
        &self,
        reason: ReentryReason,
        current: &CredentialProfile,
    ) -> Result<Option<CredentialProfile>, crate::Error>;
}

/// Always-decline policy for unattended deployments
pub struct DeclinePrompt;

#[async_trait]
impl CredentialPrompt for DeclinePrompt {
    async fn reenter(
        &self,
        _reason: ReentryReason,
        _current: &CredentialProfile,
    ) -> Result<Option<CredentialProfile>, crate::Error> {
        Ok(None)
    }
}
