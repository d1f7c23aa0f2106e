//! Pure decision functions for the grant and access paths.
//!
//! These are deterministic functions of a record snapshot, kept free of I/O
//! so the race-critical branches can be tested (and property-tested) in
//! isolation. The service applies them inside store transactions.

use crate::record::TrialState;
use veilforge_types::Plan;

/// Watch-progress percentage required to earn the trial. Inclusive cut-off:
/// 89.999 does not qualify.
pub const WATCH_THRESHOLD: f64 = 90.0;

/// Outcome of evaluating a watch-progress signal against current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantDecision {
    /// Grant the trial now.
    Grant,
    /// Premium principals never need a trial.
    PremiumNoTrial,
    /// Below threshold, or the trial already exists.
    NoChange,
}

/// Decides whether a watch-progress signal earns the one-time trial.
#[must_use]
pub fn decide_grant(plan: Plan, trial: &TrialState, percent_watched: f64) -> GrantDecision {
    if plan.is_premium() {
        return GrantDecision::PremiumNoTrial;
    }
    if percent_watched >= WATCH_THRESHOLD && !trial.available {
        GrantDecision::Grant
    } else {
        GrantDecision::NoChange
    }
}

/// Outcome of an access check against plan + trial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Plan is premium; no trial mutation involved.
    Premium,
    /// A granted, unconsumed trial covers this access.
    Trial,
    /// Neither premium nor a consumable trial.
    Locked,
}

/// Decides whether a principal may use a gated feature right now.
///
/// `used_at` is the canonical consumed marker: an `available` flag left true
/// after consumption never re-authorizes access.
#[must_use]
pub fn decide_access(plan: Plan, trial: &TrialState) -> AccessDecision {
    if plan.is_premium() {
        AccessDecision::Premium
    } else if trial.is_consumable() {
        AccessDecision::Trial
    } else {
        AccessDecision::Locked
    }
}
