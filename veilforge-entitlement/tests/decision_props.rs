//! Property tests for the pure grant/access decision functions.

use proptest::prelude::*;
use veilforge_entitlement::{
    decide_access, decide_grant, AccessDecision, GrantDecision, TrialState, WATCH_THRESHOLD,
};
use veilforge_types::Plan;

fn trial(available: bool, used: bool) -> TrialState {
    TrialState {
        available,
        granted_at: available.then(chrono::Utc::now),
        used_at: used.then(chrono::Utc::now),
    }
}

proptest! {
    #[test]
    fn below_threshold_never_grants(percent in 0.0f64..WATCH_THRESHOLD) {
        prop_assert_eq!(
            decide_grant(Plan::Free, &TrialState::default(), percent),
            GrantDecision::NoChange
        );
    }

    #[test]
    fn at_or_above_threshold_grants_fresh_free_principal(percent in WATCH_THRESHOLD..=100.0f64) {
        prop_assert_eq!(
            decide_grant(Plan::Free, &TrialState::default(), percent),
            GrantDecision::Grant
        );
    }

    #[test]
    fn premium_never_grants(percent in 0.0f64..=100.0f64, available: bool, used: bool) {
        prop_assert_eq!(
            decide_grant(Plan::Premium, &trial(available, used), percent),
            GrantDecision::PremiumNoTrial
        );
    }

    #[test]
    fn existing_grant_blocks_regrant(percent in WATCH_THRESHOLD..=100.0f64, used: bool) {
        prop_assert_eq!(
            decide_grant(Plan::Free, &trial(true, used), percent),
            GrantDecision::NoChange
        );
    }

    #[test]
    fn premium_always_wins_access(available: bool, used: bool) {
        prop_assert_eq!(
            decide_access(Plan::Premium, &trial(available, used)),
            AccessDecision::Premium
        );
    }

    #[test]
    fn used_at_blocks_access_regardless_of_available_flag(available: bool) {
        prop_assert_eq!(
            decide_access(Plan::Free, &trial(available, true)),
            AccessDecision::Locked
        );
    }
}

#[test]
fn threshold_boundary_is_inclusive() {
    assert_eq!(
        decide_grant(Plan::Free, &TrialState::default(), 90.0),
        GrantDecision::Grant
    );
    assert_eq!(
        decide_grant(Plan::Free, &TrialState::default(), 89.0),
        GrantDecision::NoChange
    );
}

#[test]
fn access_truth_table() {
    assert_eq!(
        decide_access(Plan::Free, &trial(false, false)),
        AccessDecision::Locked
    );
    assert_eq!(
        decide_access(Plan::Free, &trial(true, false)),
        AccessDecision::Trial
    );
    assert_eq!(
        decide_access(Plan::Free, &trial(true, true)),
        AccessDecision::Locked
    );
    assert_eq!(
        decide_access(Plan::Free, &trial(false, true)),
        AccessDecision::Locked
    );
}
