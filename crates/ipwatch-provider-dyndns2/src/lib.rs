// # dyndns2 Provider Client
//
// This crate provides the update client for dyndns2-speaking providers
// (Google Domains, DNS-O-Matic, ipv64.net and others expose the same
// `/nic/update` surface).
//
// ## Behavior
//
// - Makes ONE HTTP request per reconciler attempt
// - Classifies the plain-text answer into the core outcome taxonomy
// - Connection failures become `UpdateOutcome::TransientError`, not errors:
//   not reaching the provider is an answer the reconciler knows how to
//   handle
// - NO retry logic (owned by the reconciler's recovery branches)
// - NO caching, no state: the client is a pure request/interpret function
//
// ## Security
//
// The update secret travels as HTTP basic auth and never appears in logs;
// the request URL is logged without its credentials.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use ipwatch_core::config::ProviderConfig;
use ipwatch_core::traits::{ProviderClient, UpdateOutcome};
use ipwatch_core::{CredentialProfile, Error, Result};

/// Default HTTP timeout for update requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// dyndns2 update client
///
/// The endpoint comes from the credential profile, which already carries
/// the constructed `/nic/update` template for its domain; this client only
/// appends the address and interprets the answer.
#[derive(Debug, Clone)]
pub struct Dyndns2Client {
    client: reqwest::Client,
}

impl Dyndns2Client {
    /// Create a client with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with an explicit timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::provider(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;
        Self::with_timeout(Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl ProviderClient for Dyndns2Client {
    async fn update(&self, profile: &CredentialProfile, ip: IpAddr) -> Result<UpdateOutcome> {
        let url = profile.update_url(ip);
        tracing::debug!("submitting update: {}", url);

        let response = match self
            .client
            .post(&url)
            .basic_auth(&profile.username, Some(&profile.secret))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                // No response was obtained; the reconciler defers to the
                // next tick
                return Ok(UpdateOutcome::TransientError(e.to_string()));
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(UpdateOutcome::TransientError(e.to_string())),
        };

        tracing::info!("provider API response: {}", body.trim());
        Ok(UpdateOutcome::from_response(&body))
    }
}
