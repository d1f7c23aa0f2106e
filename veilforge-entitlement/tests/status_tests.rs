mod common;

use common::{alice, harness};
use pretty_assertions::assert_eq;
use veilforge_entitlement::security_potential;
use veilforge_types::{FeatureTag, Plan};

#[tokio::test]
async fn fresh_principal_status() {
    let h = harness();
    let status = h.service.status(&alice()).await.unwrap();

    assert_eq!(status.plan, Plan::Free);
    assert!(!status.one_time_trial_available);
    assert_eq!(status.one_time_trial_used_at, None);
    assert_eq!(status.processing_delay_seconds, 5);
    assert_eq!(status.security_potential, 90);
}

#[tokio::test]
async fn status_materializes_the_record() {
    let h = harness();
    assert!(h.store.is_empty().await);
    h.service.status(&alice()).await.unwrap();
    assert_eq!(h.store.len().await, 1);
}

#[tokio::test]
async fn status_reflects_grant_then_consumption() {
    let h = harness();
    h.service
        .record_watch_progress(&alice(), 95.0, Some("s1".into()))
        .await
        .unwrap();

    let granted = h.service.status(&alice()).await.unwrap();
    assert!(granted.one_time_trial_available);
    assert_eq!(granted.one_time_trial_used_at, None);

    h.service
        .consume(&alice(), FeatureTag::MultiLayer)
        .await
        .unwrap();

    let consumed = h.service.status(&alice()).await.unwrap();
    assert!(consumed.one_time_trial_used_at.is_some());
}

#[tokio::test]
async fn premium_status_scores_100() {
    let h = harness();
    h.service.upgrade(&alice()).await.unwrap();

    let status = h.service.status(&alice()).await.unwrap();
    assert_eq!(status.plan, Plan::Premium);
    assert_eq!(status.security_potential, 100);
}

#[tokio::test]
async fn status_projection_uses_wire_names() {
    let h = harness();
    let status = h.service.status(&alice()).await.unwrap();
    let value = serde_json::to_value(&status).unwrap();

    assert_eq!(value["plan"], "free");
    assert_eq!(value["oneTimeTrialAvailable"], false);
    assert!(value["oneTimeTrialUsedAt"].is_null());
    assert_eq!(value["processingDelaySeconds"], 5);
    assert_eq!(value["securityPotential"], 90);
}

// ── Upgrade ──────────────────────────────────────────────────────

#[tokio::test]
async fn upgrade_is_idempotent_and_monotonic() {
    let h = harness();
    let first = h.service.upgrade(&alice()).await.unwrap();
    assert_eq!(first, Plan::Premium);

    let record = h.store.get(&alice().id).await.unwrap().unwrap();
    assert!(record.upgraded_at.is_some());

    let second = h.service.upgrade(&alice()).await.unwrap();
    assert_eq!(second, Plan::Premium);
    let record = h.store.get(&alice().id).await.unwrap().unwrap();
    assert_eq!(record.plan, Plan::Premium);
    assert!(record.upgraded_at.is_some());
}

#[tokio::test]
async fn upgrade_preserves_created_at() {
    let h = harness();
    h.service.status(&alice()).await.unwrap();
    let created = h.store.get(&alice().id).await.unwrap().unwrap().created_at;

    h.clock.advance_millis(5_000);
    h.service.upgrade(&alice()).await.unwrap();

    let record = h.store.get(&alice().id).await.unwrap().unwrap();
    assert_eq!(record.created_at, created);
    assert_ne!(record.upgraded_at, Some(created));
}

#[test]
fn security_potential_is_a_function_of_plan_only() {
    assert_eq!(security_potential(Plan::Free), 90);
    assert_eq!(security_potential(Plan::Premium), 100);
}
