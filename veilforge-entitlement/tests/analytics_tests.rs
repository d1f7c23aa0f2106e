use chrono::{TimeZone, Utc};
use veilforge_entitlement::{AnalyticsEvent, AnalyticsSink, EventId, EventKind, MemorySink};
use veilforge_types::{FeatureTag, PrincipalId};

#[test]
fn event_ids_are_time_ordered_v7_uuids() {
    let a = EventId::new();
    let b = EventId::new();
    assert_ne!(a, b);

    // now_v7 is the only uuid construction the engine relies on.
    let raw = serde_json::to_value(EventId::new()).unwrap();
    let parsed = uuid::Uuid::parse_str(raw.as_str().unwrap()).unwrap();
    assert_eq!(parsed.get_version_num(), 7);
}

#[test]
fn event_serializes_with_snake_case_type_tag() {
    let at = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
    let event = AnalyticsEvent::new(
        PrincipalId::from("u1"),
        EventKind::TrialConsumed {
            feature: FeatureTag::MultiLayer,
        },
        at,
    );

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "trial_consumed");
    assert_eq!(value["feature"], "multiLayer");
    assert_eq!(value["principal"], "u1");
}

#[test]
fn memory_sink_preserves_recording_order() {
    let sink = MemorySink::new();
    let at = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();

    sink.record(AnalyticsEvent::new(
        PrincipalId::from("u1"),
        EventKind::ProcessingAttempt,
        at,
    ));
    sink.record(AnalyticsEvent::new(
        PrincipalId::from("u1"),
        EventKind::ProcessingCompleted,
        at,
    ));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0].kind, EventKind::ProcessingAttempt));
    assert!(matches!(events[1].kind, EventKind::ProcessingCompleted));
}
