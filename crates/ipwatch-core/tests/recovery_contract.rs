//! Contract: failure recovery branches
//!
//! Constraints verified:
//! - Auth failure with re-entry declined deletes the profile (and only
//!   then); bad host never deletes it
//! - Re-entered credentials are saved and drive a second attempt
//! - The recovery loop is bounded by the prompt, not by an internal retry
//!   policy

mod common;

use common::*;
use ipwatch_core::traits::{ReentryReason, StateStore};
use ipwatch_core::{CredentialProfile, MemoryStore, Reconciler, TickReport, UpdateOutcome};

fn replacement_profile() -> CredentialProfile {
    CredentialProfile::new(
        "home.example.com",
        "fresh-user",
        "fresh-pass",
        "domains.google.com",
    )
    .unwrap()
}

#[tokio::test]
async fn declined_auth_failure_deletes_the_profile() {
    let current = ip("5.6.7.9");

    let store = MemoryStore::new().with_profile(test_profile()).await;
    let provider = ScriptedProvider::new([UpdateOutcome::AuthFailure]);
    let prompt = ScriptedPrompt::declining();

    let reconciler = Reconciler::new(
        Box::new(FixedIpResolver::new(current)),
        Box::new(provider.clone()),
        Box::new(store.clone()),
        Box::new(RecordingNotifier::new()),
        Box::new(prompt.clone()),
    );

    let report = reconciler.run_tick().await.unwrap();
    assert_eq!(report, TickReport::AuthFailed { ip: current });
    assert!(!report.is_success());

    assert_eq!(prompt.reasons(), vec![ReentryReason::AuthFailure]);
    assert!(
        store.load_profile().await.unwrap().is_none(),
        "profile must no longer load after a declined auth failure"
    );

    // Terminal path still records the attempted IP
    assert_eq!(store.load_state().await.unwrap().last_ip, Some(current));
}

#[tokio::test]
async fn reentered_credentials_drive_a_second_attempt() {
    let current = ip("5.6.7.9");

    let store = MemoryStore::new().with_profile(test_profile()).await;
    let provider = ScriptedProvider::new([UpdateOutcome::AuthFailure, UpdateOutcome::Success]);
    let prompt = ScriptedPrompt::with_replies([Some(replacement_profile())]);

    let reconciler = Reconciler::new(
        Box::new(FixedIpResolver::new(current)),
        Box::new(provider.clone()),
        Box::new(store.clone()),
        Box::new(RecordingNotifier::new()),
        Box::new(prompt),
    );

    let report = reconciler.run_tick().await.unwrap();
    assert_eq!(report, TickReport::Updated { ip: current });

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].username, "generated-user");
    assert_eq!(calls[1].username, "fresh-user", "retry uses the new profile");

    // The replacement was persisted before the retry
    assert_eq!(
        store.load_profile().await.unwrap().map(|p| p.username),
        Some("fresh-user".to_string())
    );
    assert_eq!(store.load_state().await.unwrap().last_ip, Some(current));
}

#[tokio::test]
async fn declined_bad_host_keeps_the_profile() {
    let current = ip("5.6.7.9");

    let store = MemoryStore::new().with_profile(test_profile()).await;
    store
        .save_settings(&ipwatch_core::NotificationSettings {
            preference: ipwatch_core::NotificationPreference::All,
            recipient: Some("owner@example.com".to_string()),
        })
        .await
        .unwrap();

    let provider = ScriptedProvider::new([UpdateOutcome::BadHost]);
    let notifier = RecordingNotifier::new();
    let prompt = ScriptedPrompt::declining();

    let reconciler = Reconciler::new(
        Box::new(FixedIpResolver::new(current)),
        Box::new(provider),
        Box::new(store.clone()),
        Box::new(notifier.clone()),
        Box::new(prompt.clone()),
    );

    let report = reconciler.run_tick().await.unwrap();
    assert_eq!(report, TickReport::BadHost { ip: current });
    assert!(!report.is_success());

    assert_eq!(prompt.reasons(), vec![ReentryReason::BadHost]);
    assert!(
        store.load_profile().await.unwrap().is_some(),
        "a bad host outcome must not delete the profile"
    );
    assert_eq!(store.load_state().await.unwrap().last_ip, Some(current));

    // The operator hears about the durable configuration error
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "IP CHANGE FAILED!");
}

#[tokio::test]
async fn bad_host_recovery_loops_back_to_the_update() {
    let current = ip("5.6.7.9");

    let store = MemoryStore::new().with_profile(test_profile()).await;
    let provider = ScriptedProvider::new([UpdateOutcome::BadHost, UpdateOutcome::Success]);
    let prompt = ScriptedPrompt::with_replies([Some(replacement_profile())]);

    let reconciler = Reconciler::new(
        Box::new(FixedIpResolver::new(current)),
        Box::new(provider.clone()),
        Box::new(store.clone()),
        Box::new(RecordingNotifier::new()),
        Box::new(prompt),
    );

    let report = reconciler.run_tick().await.unwrap();
    assert_eq!(report, TickReport::Updated { ip: current });
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn repeated_declines_terminate_after_one_offer_each() {
    // The prompt script is exhausted after the first decline; a second
    // provider outcome would panic the scripted double, so reaching the
    // terminal report proves the loop offered re-entry exactly once.
    let current = ip("5.6.7.9");

    let store = MemoryStore::new().with_profile(test_profile()).await;
    let provider = ScriptedProvider::new([UpdateOutcome::AuthFailure]);
    let prompt = ScriptedPrompt::declining();

    let reconciler = Reconciler::new(
        Box::new(FixedIpResolver::new(current)),
        Box::new(provider.clone()),
        Box::new(store),
        Box::new(RecordingNotifier::new()),
        Box::new(prompt.clone()),
    );

    let report = reconciler.run_tick().await.unwrap();
    assert_eq!(report, TickReport::AuthFailed { ip: current });
    assert_eq!(provider.call_count(), 1);
    assert_eq!(prompt.reasons().len(), 1);
}
