// # HTTP IP Resolver
//
// This crate provides the lookup-service IP resolver for ipwatch.
//
// ## Purpose
//
// A host behind NAT cannot learn its public address from its interfaces, so
// the resolver asks a public "what is my IP" service and parses the
// plain-text body. One GET per tick, no caching, no internal retry: if the
// lookup fails, the tick has nothing useful to do and the caller terminates.

use std::net::IpAddr;
use std::time::Duration;

use ipwatch_core::config::ResolverConfig;
use ipwatch_core::traits::IpResolver;
use ipwatch_core::{Error, Result};

/// Default connect/read timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Well-known plain-text lookup services
///
/// The first entry is the default; the rest are documented alternatives an
/// operator can point `IPWATCH_LOOKUP_URL` at.
pub const LOOKUP_SERVICES: &[&str] = &[
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
];

/// Lookup-service backed IP resolver
pub struct HttpIpResolver {
    url: String,
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver against `url` with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Create a resolver with an explicit timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a resolver from a validated configuration
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;
        Self::with_timeout(&config.url, Duration::from_secs(config.timeout_secs))
    }
}

/// Parse a lookup-service response body into an address
///
/// Services differ in trailing-newline behavior, so the body is trimmed
/// before parsing.
fn parse_ip_body(body: &str) -> Result<IpAddr> {
    let body = body.trim();
    body.parse().map_err(|_| {
        Error::network_unavailable(format!("lookup service returned a non-IP body: {:?}", body))
    })
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network_unavailable(format!("lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network_unavailable(format!(
                "lookup service answered {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network_unavailable(format!("failed to read lookup body: {}", e)))?;

        let ip = parse_ip_body(&body)?;
        tracing::debug!("lookup service {} reports {}", self.url, ip);
        Ok(ip)
    }
}
