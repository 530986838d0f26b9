// # IP Resolver Trait
//
// Defines the interface for fetching the host's current external IP.
//
// ## Implementations
//
// - HTTP lookup service: `ipwatch-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ipwatch_core::IpResolver;
//
// let resolver = /* IpResolver implementation */;
// let current = resolver.resolve().await?;
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for external-IP resolver implementations
///
/// One blocking network call per invocation. No retry lives here: if the
/// lookup fails there is nothing useful a tick can do, and the retry policy
/// (the next scheduled tick) belongs to the caller.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Fetch the current external IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current external IP
    /// - `Err(Error::NetworkUnavailable)`: The lookup service could not be
    ///   reached or did not return a parseable address
    async fn resolve(&self) -> Result<IpAddr, crate::Error>;
}
