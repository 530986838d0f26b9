// # Provider Client Trait
//
// Defines the interface for issuing the dynamic-DNS update request and the
// closed outcome taxonomy the reconciler switches on.
//
// ## Protocol
//
// dyndns2: `POST https://{host}/nic/update?hostname={domain}&myip={ip}`
// with HTTP basic auth, answered by a short plain-text token. The token
// rules are fixed by the protocol and implemented here as a pure function
// so tests can inject raw response bodies.
//
// ## No retry
//
// The client performs one request and interprets the answer. Recovery
// (credential re-entry, waiting for the next tick) is the reconciler's
// responsibility; keeping the client a pure request/interpret function is
// what makes it testable with scripted outcomes.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::profile::CredentialProfile;

/// Outcome of one update request, as classified from the provider's answer
///
/// This is the central contract between the provider client and the
/// reconciler: every branch of the recovery logic corresponds to exactly
/// one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The provider accepted the update (`good ...`)
    Success,

    /// The provider reports the record already had this IP (`nochg ...`)
    NoChange,

    /// The domain does not exist, is not fully qualified, or does not have
    /// dynamic DNS enabled (`nohost` / `notfqdn`)
    BadHost,

    /// The provider rejected the credentials, or answered with a token we
    /// do not recognize (treated as authentication-class by compatibility
    /// with the provider's observed behavior)
    AuthFailure,

    /// No well-formed response was obtained (connection refused, timeout,
    /// DNS failure on the way to the provider)
    TransientError(String),
}

impl UpdateOutcome {
    /// Classify a raw dyndns2 response body
    ///
    /// Token rules:
    /// - body begins with `good` → `Success`
    /// - body begins with `nochg` → `NoChange`
    /// - body equals `nohost` or `notfqdn` → `BadHost`
    /// - anything else → `AuthFailure`
    pub fn from_response(body: &str) -> Self {
        let body = body.trim();
        if body.starts_with("good") {
            Self::Success
        } else if body.starts_with("nochg") {
            Self::NoChange
        } else if body == "nohost" || body == "notfqdn" {
            Self::BadHost
        } else {
            Self::AuthFailure
        }
    }

    /// Whether this outcome means the record now holds the submitted IP
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::NoChange)
    }
}

/// Trait for dynamic-DNS provider client implementations
///
/// # Errors
///
/// `Err` is reserved for plumbing failures (a malformed endpoint, a client
/// that cannot be built). Everything the provider can *say* — including
/// failing to answer at all — is an `Ok(UpdateOutcome)`.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Submit `ip` for the profile's domain and classify the answer
    async fn update(
        &self,
        profile: &CredentialProfile,
        ip: IpAddr,
    ) -> Result<UpdateOutcome, crate::Error>;
}
