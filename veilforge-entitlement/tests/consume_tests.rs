mod common;

use common::{alice, harness, T0_MS};
use std::sync::Arc;
use veilforge_entitlement::{AccessReason, EventKind, WINDOW_MS};
use veilforge_types::FeatureTag;

#[tokio::test]
async fn consume_without_trial_is_locked() {
    let h = harness();
    let outcome = h
        .service
        .consume(&alice(), FeatureTag::MultiLayer)
        .await
        .unwrap();

    assert!(!outcome.allowed);
    assert_eq!(outcome.reason, Some(AccessReason::Locked));
    assert!(!outcome.trial_consumed);
    assert!(h.sink.is_empty());
}

#[tokio::test]
async fn consume_granted_trial_succeeds_once() {
    let h = harness();
    h.service
        .record_watch_progress(&alice(), 95.0, None)
        .await
        .unwrap();

    let first = h
        .service
        .consume(&alice(), FeatureTag::MultiLayer)
        .await
        .unwrap();
    assert!(first.allowed);
    assert!(first.trial_consumed);
    assert_eq!(first.reason, None);

    let second = h
        .service
        .consume(&alice(), FeatureTag::MultiLayer)
        .await
        .unwrap();
    assert!(!second.allowed);
    assert_eq!(second.reason, Some(AccessReason::Locked));

    let record = h.store.get(&alice().id).await.unwrap().unwrap();
    assert_eq!(record.trial.used_at.unwrap().timestamp_millis(), T0_MS);
}

#[tokio::test]
async fn premium_bypasses_trial_state_entirely() {
    let h = harness();
    h.service.upgrade(&alice()).await.unwrap();

    let outcome = h
        .service
        .consume(&alice(), FeatureTag::MultiLayer)
        .await
        .unwrap();
    assert!(outcome.allowed);
    assert_eq!(outcome.reason, Some(AccessReason::Premium));
    assert!(!outcome.trial_consumed);

    // Repeatable: premium never burns anything.
    let again = h
        .service
        .consume(&alice(), FeatureTag::MultiLayer)
        .await
        .unwrap();
    assert!(again.allowed);
    assert_eq!(again.reason, Some(AccessReason::Premium));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_consumption_has_exactly_one_winner() {
    let h = harness();
    h.service
        .record_watch_progress(&alice(), 95.0, None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&h.service);
        handles.push(tokio::spawn(async move {
            service.consume(&alice(), FeatureTag::MultiLayer).await
        }));
    }

    let mut winners = 0;
    let mut locked = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        if outcome.allowed {
            assert!(outcome.trial_consumed);
            winners += 1;
        } else {
            assert_eq!(outcome.reason, Some(AccessReason::Locked));
            locked += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(locked, 15);
}

#[tokio::test]
async fn consumption_event_fires_after_commit() {
    let h = harness();
    h.service
        .record_watch_progress(&alice(), 95.0, None)
        .await
        .unwrap();
    h.service
        .consume(&alice(), FeatureTag::MultiLayer)
        .await
        .unwrap();

    let events = h.sink.events();
    assert!(events.iter().any(|e| matches!(
        e.kind,
        EventKind::TrialConsumed {
            feature: FeatureTag::MultiLayer
        }
    )));
}

// ── Processing gate (forceTrial path) ────────────────────────────

#[tokio::test]
async fn processing_gate_with_trial_does_not_consume_by_default() {
    let h = harness();
    h.service
        .record_watch_progress(&alice(), 95.0, None)
        .await
        .unwrap();

    let outcome = h
        .service
        .authorize_processing(&alice(), false)
        .await
        .unwrap();
    assert!(outcome.allowed);
    assert!(!outcome.trial_consumed);

    let record = h.store.get(&alice().id).await.unwrap().unwrap();
    assert!(record.trial.is_consumable());
}

#[tokio::test]
async fn processing_gate_with_force_trial_consumes() {
    let h = harness();
    h.service
        .record_watch_progress(&alice(), 95.0, None)
        .await
        .unwrap();

    let outcome = h.service.authorize_processing(&alice(), true).await.unwrap();
    assert!(outcome.allowed);
    assert!(outcome.trial_consumed);

    // Burned: the gate now locks, same as the dedicated consume path.
    let again = h
        .service
        .authorize_processing(&alice(), true)
        .await
        .unwrap();
    assert!(!again.allowed);
    assert_eq!(again.reason, Some(AccessReason::Locked));
}

#[tokio::test]
async fn processing_gate_locked_without_trial_or_premium() {
    let h = harness();
    let outcome = h
        .service
        .authorize_processing(&alice(), true)
        .await
        .unwrap();
    assert!(!outcome.allowed);
    assert_eq!(outcome.reason, Some(AccessReason::Locked));
}

#[tokio::test]
async fn processing_gate_premium_never_mutates_trial() {
    let h = harness();
    h.service
        .record_watch_progress(&alice(), 95.0, None)
        .await
        .unwrap();
    h.clock.advance_millis(WINDOW_MS);
    h.service.upgrade(&alice()).await.unwrap();

    let outcome = h.service.authorize_processing(&alice(), true).await.unwrap();
    assert!(outcome.allowed);
    assert_eq!(outcome.reason, Some(AccessReason::Premium));
    assert!(!outcome.trial_consumed);

    let record = h.store.get(&alice().id).await.unwrap().unwrap();
    assert!(record.trial.is_consumable());
}
