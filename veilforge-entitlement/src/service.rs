//! Entitlement operations: grant, consume, status, upgrade, processing gate.
//!
//! Every state-dependent mutation runs inside a store transaction so that
//! concurrent requests for the same principal serialize. Analytics events are
//! emitted only after the transaction returns.

use crate::analytics::{AnalyticsEvent, AnalyticsSink, EventKind};
use crate::clock::Clock;
use crate::decision::{decide_access, decide_grant, AccessDecision, GrantDecision};
use crate::error::EntitlementResult;
use crate::record::{EntitlementRecord, EntitlementUpdate};
use crate::store::MemoryStore;
use crate::throttle::ThrottleGuard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use veilforge_types::{FeatureTag, Plan, Principal, PrincipalId};

/// Result of a watch-progress submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOutcome {
    /// The trial was granted by this call.
    pub granted: bool,
    /// Whether a granted, unconsumed trial exists after this call.
    pub trial_available: bool,
}

/// Why an access check resolved the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessReason {
    /// Plan is premium; no trial involved.
    Premium,
    /// Neither premium nor a consumable trial.
    Locked,
}

/// Result of a trial-consumption or processing-gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    /// Access is permitted.
    pub allowed: bool,
    /// Set for the premium and locked cases.
    pub reason: Option<AccessReason>,
    /// The one-time trial was consumed by this call.
    pub trial_consumed: bool,
}

impl AccessOutcome {
    fn premium() -> Self {
        Self {
            allowed: true,
            reason: Some(AccessReason::Premium),
            trial_consumed: false,
        }
    }

    fn trial(consumed: bool) -> Self {
        Self {
            allowed: true,
            reason: None,
            trial_consumed: consumed,
        }
    }

    fn locked() -> Self {
        Self {
            allowed: false,
            reason: Some(AccessReason::Locked),
            trial_consumed: false,
        }
    }
}

/// Client-facing projection of a principal's entitlement state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementStatus {
    /// Current plan.
    pub plan: Plan,
    /// A granted, unconsumed trial exists.
    pub one_time_trial_available: bool,
    /// When the trial was consumed, if ever.
    pub one_time_trial_used_at: Option<DateTime<Utc>>,
    /// Advisory free-tier latency signal; not enforced here.
    pub processing_delay_seconds: u32,
    /// Advisory display score; never an access-control signal.
    pub security_potential: u8,
}

/// The entitlement engine.
///
/// Store, throttle, analytics sink, and clock are injected once at
/// construction and shared across requests.
pub struct EntitlementService {
    store: Arc<MemoryStore>,
    throttle: ThrottleGuard,
    analytics: Arc<dyn AnalyticsSink>,
    clock: Arc<dyn Clock>,
}

impl EntitlementService {
    /// Creates a service over the given capabilities.
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        throttle: ThrottleGuard,
        analytics: Arc<dyn AnalyticsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            throttle,
            analytics,
            clock,
        }
    }

    /// Evaluates a watch-progress signal for the one-time trial grant.
    ///
    /// Throttled calls take a read-only fast path: no stamp movement, no
    /// record mutation, no analytics.
    pub async fn record_watch_progress(
        &self,
        principal: &Principal,
        percent_watched: f64,
        watch_session: Option<String>,
    ) -> EntitlementResult<WatchOutcome> {
        let now = self.clock.now();

        if self.throttle.check_and_stamp(&principal.id, now.timestamp_millis()) {
            debug!(principal = %principal.id, "watch progress throttled");
            let available = self
                .store
                .get(&principal.id)
                .await?
                .map(|r| r.trial.available)
                .unwrap_or(false);
            return Ok(WatchOutcome {
                granted: false,
                trial_available: available,
            });
        }

        let (decision, available) = self
            .store
            .transact(
                &principal.id,
                || EntitlementRecord::materialize(principal, now),
                |record| {
                    let decision = decide_grant(record.plan, &record.trial, percent_watched);
                    if decision == GrantDecision::Grant {
                        record.apply(EntitlementUpdate::GrantTrial { granted_at: now });
                    }
                    let available = match decision {
                        GrantDecision::PremiumNoTrial => false,
                        _ => record.trial.available,
                    };
                    (decision, available)
                },
            )
            .await?;

        match decision {
            GrantDecision::Grant => {
                debug!(principal = %principal.id, "one-time trial granted");
                self.emit(
                    &principal.id,
                    EventKind::TrialClaimed {
                        watch_session,
                    },
                    now,
                );
            }
            GrantDecision::NoChange => {
                self.emit(
                    &principal.id,
                    EventKind::WatchProgress {
                        percent: percent_watched,
                    },
                    now,
                );
            }
            GrantDecision::PremiumNoTrial => {}
        }

        Ok(WatchOutcome {
            granted: decision == GrantDecision::Grant,
            trial_available: available,
        })
    }

    /// Atomically checks and consumes the one-time trial for a feature.
    ///
    /// The read-check-write runs in one transaction: of N concurrent calls
    /// against a consumable trial, exactly one consumes it; the rest see
    /// locked. Feature validation happens before this method is reached (the
    /// tag type cannot hold an unknown value).
    pub async fn consume(
        &self,
        principal: &Principal,
        feature: FeatureTag,
    ) -> EntitlementResult<AccessOutcome> {
        let now = self.clock.now();

        let decision = self
            .store
            .transact(
                &principal.id,
                || EntitlementRecord::materialize(principal, now),
                |record| {
                    let decision = decide_access(record.plan, &record.trial);
                    if decision == AccessDecision::Trial {
                        record.apply(EntitlementUpdate::ConsumeTrial { used_at: now });
                    }
                    decision
                },
            )
            .await?;

        let outcome = match decision {
            AccessDecision::Premium => AccessOutcome::premium(),
            AccessDecision::Trial => AccessOutcome::trial(true),
            AccessDecision::Locked => AccessOutcome::locked(),
        };

        if outcome.allowed {
            debug!(principal = %principal.id, %feature, consumed = outcome.trial_consumed, "trial access granted");
            self.emit(&principal.id, EventKind::TrialConsumed { feature }, now);
        }

        Ok(outcome)
    }

    /// Access check for the gated processing path.
    ///
    /// Same decision as [`consume`](Self::consume), except an available trial
    /// is only consumed when the caller opts in with `force_trial`; otherwise
    /// the trial is left intact for the dedicated consume endpoint.
    pub async fn authorize_processing(
        &self,
        principal: &Principal,
        force_trial: bool,
    ) -> EntitlementResult<AccessOutcome> {
        let now = self.clock.now();

        let decision = self
            .store
            .transact(
                &principal.id,
                || EntitlementRecord::materialize(principal, now),
                |record| {
                    let decision = decide_access(record.plan, &record.trial);
                    if decision == AccessDecision::Trial && force_trial {
                        record.apply(EntitlementUpdate::ConsumeTrial { used_at: now });
                    }
                    decision
                },
            )
            .await?;

        let outcome = match decision {
            AccessDecision::Premium => AccessOutcome::premium(),
            AccessDecision::Trial => AccessOutcome::trial(force_trial),
            AccessDecision::Locked => AccessOutcome::locked(),
        };

        if outcome.trial_consumed {
            self.emit(
                &principal.id,
                EventKind::TrialConsumed {
                    feature: FeatureTag::MultiLayer,
                },
                now,
            );
        }

        Ok(outcome)
    }

    /// Builds the client-facing status projection, materializing the record
    /// if this is the principal's first entitlement-related request.
    pub async fn status(&self, principal: &Principal) -> EntitlementResult<EntitlementStatus> {
        let now = self.clock.now();

        let record = self
            .store
            .transact(
                &principal.id,
                || EntitlementRecord::materialize(principal, now),
                |record| record.clone(),
            )
            .await?;

        Ok(EntitlementStatus {
            plan: record.plan,
            one_time_trial_available: record.trial.available,
            one_time_trial_used_at: record.trial.used_at,
            processing_delay_seconds: record.feature_config.processing_delay_seconds,
            security_potential: security_potential(record.plan),
        })
    }

    /// Moves the plan to premium. Trust-the-caller demo operation standing in
    /// for a real billing integration. Idempotent: repeat calls refresh
    /// `upgradedAt` and nothing else.
    pub async fn upgrade(&self, principal: &Principal) -> EntitlementResult<Plan> {
        let now = self.clock.now();

        self.store
            .transact(
                &principal.id,
                || EntitlementRecord::materialize(principal, now),
                |record| {
                    record.apply(EntitlementUpdate::Upgrade { upgraded_at: now });
                },
            )
            .await?;

        debug!(principal = %principal.id, "plan upgraded to premium");
        self.emit(&principal.id, EventKind::PlanUpgraded, now);
        Ok(Plan::Premium)
    }

    /// Records an out-of-band analytics event for a principal at the current
    /// time. Used by callers wrapping gated work around an access check.
    pub fn note(&self, principal: &PrincipalId, kind: EventKind) {
        self.emit(principal, kind, self.clock.now());
    }

    fn emit(&self, principal: &PrincipalId, kind: EventKind, at: DateTime<Utc>) {
        self.analytics
            .record(AnalyticsEvent::new(principal.clone(), kind, at));
    }
}

/// Derived display score: 100 for premium, otherwise a fixed weighted
/// composite capped at 90 for the free tier.
#[must_use]
pub fn security_potential(plan: Plan) -> u8 {
    if plan.is_premium() {
        return 100;
    }
    let composite: u8 = 25 + 25 + 20 + 20;
    composite.min(90)
}
