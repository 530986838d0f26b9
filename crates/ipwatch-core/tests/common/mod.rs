//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles are counter-instrumented so tests can assert how many times
//! each collaborator was exercised, and with which arguments.

use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ipwatch_core::error::Result;
use ipwatch_core::traits::{
    CredentialPrompt, IpResolver, Notification, Notifier, ProviderClient, ReentryReason,
    UpdateOutcome,
};
use ipwatch_core::{CredentialProfile, Error};

/// A resolver that always answers with the same IP
pub struct FixedIpResolver {
    ip: IpAddr,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpResolver {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpResolver for FixedIpResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// A resolver that simulates an unreachable lookup service
pub struct UnreachableIpResolver;

#[async_trait::async_trait]
impl IpResolver for UnreachableIpResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        Err(Error::network_unavailable("connection refused"))
    }
}

/// One recorded provider call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub domain: String,
    pub username: String,
    pub url: String,
    pub ip: IpAddr,
}

/// A provider client that answers from a scripted queue of outcomes
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    outcomes: Arc<std::sync::Mutex<VecDeque<UpdateOutcome>>>,
    calls: Arc<std::sync::Mutex<Vec<RecordedCall>>>,
}

impl ScriptedProvider {
    pub fn new(outcomes: impl IntoIterator<Item = UpdateOutcome>) -> Self {
        Self {
            outcomes: Arc::new(std::sync::Mutex::new(outcomes.into_iter().collect())),
            calls: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ProviderClient for ScriptedProvider {
    async fn update(&self, profile: &CredentialProfile, ip: IpAddr) -> Result<UpdateOutcome> {
        self.calls.lock().unwrap().push(RecordedCall {
            domain: profile.domain.clone(),
            username: profile.username.clone(),
            url: profile.update_url(ip),
            ip,
        });
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider called more times than scripted");
        Ok(outcome)
    }
}

/// A notifier that records everything it is asked to send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<std::sync::Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose sends always fail (delivery must stay best-effort)
    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(std::sync::Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        if self.fail {
            return Err(Error::notification("smtp: connection refused"));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// A prompt that replies from a scripted queue; empty queue declines
#[derive(Clone, Default)]
pub struct ScriptedPrompt {
    replies: Arc<std::sync::Mutex<VecDeque<Option<CredentialProfile>>>>,
    reasons: Arc<std::sync::Mutex<Vec<ReentryReason>>>,
}

impl ScriptedPrompt {
    #[allow(dead_code)]
    pub fn declining() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_replies(replies: impl IntoIterator<Item = Option<CredentialProfile>>) -> Self {
        Self {
            replies: Arc::new(std::sync::Mutex::new(replies.into_iter().collect())),
            reasons: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    #[allow(dead_code)]
    pub fn reasons(&self) -> Vec<ReentryReason> {
        self.reasons.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CredentialPrompt for ScriptedPrompt {
    async fn reenter(
        &self,
        reason: ReentryReason,
        _current: &CredentialProfile,
    ) -> Result<Option<CredentialProfile>> {
        self.reasons.lock().unwrap().push(reason);
        Ok(self.replies.lock().unwrap().pop_front().unwrap_or(None))
    }
}

/// Profile used throughout the contract tests
pub fn test_profile() -> CredentialProfile {
    CredentialProfile::new(
        "home.example.com",
        "generated-user",
        "generated-pass",
        "domains.google.com",
    )
    .expect("test profile is valid")
}

/// Parse helper for readable IPs in assertions
pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("test IP is valid")
}
