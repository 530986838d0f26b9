// # Credential Profile
//
// The long-lived credential document for one managed domain.
//
// ## Lifecycle
//
// Created on first run (or by an explicit credentials command), then
// immutable: credential changes replace the whole profile. The per-run
// facts (last attempted IP) live in `RunState`, deliberately kept in a
// separate document with its own format version.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Credentials and endpoint template for a dyndns2-style provider
///
/// The `endpoint` is constructed once from the provider host and the domain;
/// the client only appends the IP being submitted. The update secret is held
/// in memory as plain text but never appears in `Debug` output or logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialProfile {
    /// Domain the provider should point at this host
    pub domain: String,

    /// Provider-generated update username
    pub username: String,

    /// Provider-generated update secret
    pub secret: String,

    /// Update endpoint template, e.g.
    /// `https://domains.google.com/nic/update?hostname=example.com`
    pub endpoint: String,
}

// The secret must never reach logs through Debug formatting
impl std::fmt::Debug for CredentialProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProfile")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("secret", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl CredentialProfile {
    /// Create a profile for `domain`, constructing the update endpoint
    /// against `provider_host`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the domain is not a plausible DNS name or
    /// any credential field is empty.
    pub fn new(
        domain: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
        provider_host: &str,
    ) -> Result<Self> {
        let domain = domain.into();
        let username = username.into();
        let secret = secret.into();

        validate_domain_name(&domain)?;

        if username.is_empty() {
            return Err(Error::config("update username cannot be empty"));
        }
        if secret.is_empty() {
            return Err(Error::config("update secret cannot be empty"));
        }
        if provider_host.is_empty() {
            return Err(Error::config("provider host cannot be empty"));
        }

        let endpoint = format!("https://{}/nic/update?hostname={}", provider_host, domain);

        Ok(Self {
            domain,
            username,
            secret,
            endpoint,
        })
    }

    /// Full update URL for submitting `ip`
    pub fn update_url(&self, ip: std::net::IpAddr) -> String {
        format!("{}&myip={}", self.endpoint, ip)
    }
}

/// Validate that a string is a plausible DNS domain name
///
/// Basic validation per RFC 1035; not comprehensive, but catches common
/// operator typos before they become provider round trips.
pub fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::config("domain name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        return Err(Error::config(format!(
            "domain name too long: {} chars (max 253)",
            domain.len()
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(Error::config(format!(
                "domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(Error::config(format!(
                "domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_constructed_from_host_and_domain() {
        let profile = CredentialProfile::new(
            "home.example.com",
            "generated-user",
            "generated-pass",
            "domains.google.com",
        )
        .unwrap();

        assert_eq!(
            profile.endpoint,
            "https://domains.google.com/nic/update?hostname=home.example.com"
        );

        let ip: std::net::IpAddr = "1.2.3.4".parse().unwrap();
        assert_eq!(
            profile.update_url(ip),
            "https://domains.google.com/nic/update?hostname=home.example.com&myip=1.2.3.4"
        );
    }

    #[test]
    fn rejects_empty_fields() {
        assert!(CredentialProfile::new("example.com", "", "s", "host").is_err());
        assert!(CredentialProfile::new("example.com", "u", "", "host").is_err());
        assert!(CredentialProfile::new("example.com", "u", "s", "").is_err());
    }

    #[test]
    fn rejects_malformed_domains() {
        assert!(validate_domain_name("").is_err());
        assert!(validate_domain_name("double..dot").is_err());
        assert!(validate_domain_name("-leading.example.com").is_err());
        assert!(validate_domain_name("under_score.example.com").is_err());
        assert!(validate_domain_name(&"a".repeat(254)).is_err());
        assert!(validate_domain_name("sub.example.com").is_ok());
    }

    #[test]
    fn debug_redacts_the_secret() {
        let profile =
            CredentialProfile::new("example.com", "user", "secret-value-123", "host.invalid")
                .unwrap();

        let debug_str = format!("{:?}", profile);
        assert!(!debug_str.contains("secret-value-123"));
        assert!(debug_str.contains("example.com"));
    }
}
