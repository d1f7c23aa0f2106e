//! Append-only analytics event sink.
//!
//! Events are recorded after a state transition commits, never inside the
//! transaction. Recording is best-effort: a sink that drops or fails must not
//! roll back or block the entitlement transition it describes, so the trait
//! is infallible and fire-and-forget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use uuid::Uuid;
use veilforge_types::{FeatureTag, PrincipalId};

/// Unique identifier for an analytics event (UUID v7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new event id with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A watch-progress signal earned the one-time trial.
    TrialClaimed {
        /// Client-supplied watch session, if any.
        watch_session: Option<String>,
    },
    /// A watch-progress signal that did not change state.
    WatchProgress {
        /// Percentage reported by the client.
        percent: f64,
    },
    /// The one-time trial was consumed.
    TrialConsumed {
        /// The feature it was consumed for.
        feature: FeatureTag,
    },
    /// A gated processing request was admitted.
    ProcessingAttempt,
    /// A gated processing request completed.
    ProcessingCompleted,
    /// The plan moved to premium.
    PlanUpgraded,
}

/// A single analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Event id.
    pub id: EventId,
    /// Principal the event concerns.
    pub principal: PrincipalId,
    /// What happened.
    #[serde(flatten)]
    pub kind: EventKind,
    /// When it was recorded.
    pub at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Builds an event for a principal at a given instant.
    #[must_use]
    pub fn new(principal: PrincipalId, kind: EventKind, at: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            principal,
            kind,
            at,
        }
    }
}

/// Destination for committed-transition events.
pub trait AnalyticsSink: Send + Sync {
    /// Records an event. Must not fail or block the caller meaningfully.
    fn record(&self, event: AnalyticsEvent);
}

/// Default sink: structured log lines via `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: AnalyticsEvent) {
        tracing::info!(
            event_id = %event.id,
            principal = %event.principal,
            kind = ?event.kind,
            "analytics event"
        );
    }
}

/// Buffering sink for tests and demos.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalyticsSink for MemorySink {
    fn record(&self, event: AnalyticsEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
