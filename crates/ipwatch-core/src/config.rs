//! Configuration types for the reconciliation system
//!
//! These are the typed, validated forms of whatever surface (environment
//! variables, files) the binary reads its settings from. Construction of
//! the concrete components from these structs happens in the leaf crates.

use serde::{Deserialize, Serialize};

/// Public-IP lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// URL of a plain-text "what is my IP" service
    #[serde(default = "default_lookup_url")]
    pub url: String,

    /// Connect/read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("lookup URL cannot be empty"));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "lookup URL must use HTTP or HTTPS scheme, got: {}",
                self.url
            )));
        }
        validate_timeout(self.timeout_secs)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            url: default_lookup_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Dynamic-DNS provider endpoint configuration
///
/// Only the host is configurable; the `/nic/update` path and the response
/// tokens are fixed by the dyndns2 protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider API host, e.g. `domains.google.com`
    #[serde(default = "default_provider_host")]
    pub host: String,

    /// Connect/read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.host.is_empty() {
            return Err(crate::Error::config("provider host cannot be empty"));
        }
        if self.host.contains('/') {
            return Err(crate::Error::config(format!(
                "provider host must be a bare host name, got: {}",
                self.host
            )));
        }
        validate_timeout(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            host: default_provider_host(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// State store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the persisted documents
    #[serde(default = "default_state_dir")]
    pub dir: String,
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.dir.is_empty() {
            return Err(crate::Error::config("state directory cannot be empty"));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

fn validate_timeout(timeout_secs: u64) -> Result<(), crate::Error> {
    if !(1..=120).contains(&timeout_secs) {
        return Err(crate::Error::config(format!(
            "timeout must be between 1 and 120 seconds, got: {}",
            timeout_secs
        )));
    }
    Ok(())
}

fn default_lookup_url() -> String {
    "https://api.ipify.org".to_string()
}

fn default_provider_host() -> String {
    "domains.google.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_state_dir() -> String {
    ".".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ResolverConfig::default().validate().is_ok());
        assert!(ProviderConfig::default().validate().is_ok());
        assert!(StoreConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = ResolverConfig {
            url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ResolverConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ProviderConfig {
            host: "https://domains.google.com".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
