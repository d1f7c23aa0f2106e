//! The per-principal entitlement document and its typed updates.
//!
//! Field names are a storage/wire contract (camelCase, explicit `null` for
//! unset timestamps) and must round-trip losslessly. Records are materialized
//! lazily with defaults on first touch and never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veilforge_types::{Plan, Principal, PrincipalId};

/// Default artificial processing delay surfaced to free-tier clients.
pub const DEFAULT_PROCESSING_DELAY_SECS: u32 = 5;

/// Default trial expiry window. Reserved: nothing reads it yet.
pub const DEFAULT_TRIAL_EXPIRY_DAYS: u32 = 30;

/// One-time trial state embedded in the entitlement record.
///
/// `used_at` is the canonical consumed marker; `available` alone never
/// authorizes a second consumption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialState {
    /// A trial has been granted and not yet consumed.
    pub available: bool,
    /// When the grant occurred. Set at most once per principal.
    pub granted_at: Option<DateTime<Utc>>,
    /// When the trial was consumed.
    pub used_at: Option<DateTime<Utc>>,
}

impl TrialState {
    /// True if the trial can still be consumed.
    #[must_use]
    pub fn is_consumable(&self) -> bool {
        self.available && self.used_at.is_none()
    }
}

/// Per-principal feature configuration, defaulted at creation.
///
/// Config, not hot state: no operation in this core mutates it after
/// materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    /// Artificial latency signal for free-tier processing (seconds).
    pub processing_delay_seconds: u32,
    /// Trial expiry window in days. Reserved/inert.
    pub trial_expiry_days: u32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            processing_delay_seconds: DEFAULT_PROCESSING_DELAY_SECS,
            trial_expiry_days: DEFAULT_TRIAL_EXPIRY_DAYS,
        }
    }
}

/// The root entitlement aggregate, one per principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRecord {
    /// Stable id of the owning principal.
    pub principal_id: PrincipalId,
    /// Email recorded at first materialization, display only.
    pub email: Option<String>,
    /// Current plan tier. Monotonic upward.
    pub plan: Plan,
    /// Set once, at first materialization.
    pub created_at: DateTime<Utc>,
    /// Set when the plan transitions to premium.
    pub upgraded_at: Option<DateTime<Utc>>,
    /// One-time trial state.
    pub trial: TrialState,
    /// Per-principal config, defaulted at creation.
    pub feature_config: FeatureConfig,
}

impl EntitlementRecord {
    /// Materializes a fresh record with defaults for a principal.
    #[must_use]
    pub fn materialize(principal: &Principal, created_at: DateTime<Utc>) -> Self {
        Self {
            principal_id: principal.id.clone(),
            email: principal.email.clone(),
            plan: Plan::Free,
            created_at,
            upgraded_at: None,
            trial: TrialState::default(),
            feature_config: FeatureConfig::default(),
        }
    }

    /// Applies a typed partial update to this record.
    ///
    /// Each variant touches only the fields its operation owns; there is no
    /// loose document merge anywhere in the engine.
    pub fn apply(&mut self, update: EntitlementUpdate) {
        match update {
            EntitlementUpdate::GrantTrial { granted_at } => {
                // Preserve used_at: a grant never clears consumption history.
                self.trial.available = true;
                self.trial.granted_at = Some(granted_at);
            }
            EntitlementUpdate::ConsumeTrial { used_at } => {
                // available is retained as-is; used_at alone blocks re-use.
                self.trial.used_at = Some(used_at);
            }
            EntitlementUpdate::Upgrade { upgraded_at } => {
                self.plan = Plan::Premium;
                self.upgraded_at = Some(upgraded_at);
            }
        }
    }
}

/// Typed partial update for an [`EntitlementRecord`].
///
/// Replaces the shallow document-merge writes of a generic document store:
/// every operation declares up front which fields it may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementUpdate {
    /// Grant the one-time trial. May touch `trial.available` and
    /// `trial.granted_at` only.
    GrantTrial {
        /// Grant timestamp.
        granted_at: DateTime<Utc>,
    },
    /// Consume the trial. May touch `trial.used_at` only.
    ConsumeTrial {
        /// Consumption timestamp.
        used_at: DateTime<Utc>,
    },
    /// Move the plan to premium. May touch `plan` and `upgraded_at` only.
    /// Idempotent: repeated applications refresh `upgraded_at`.
    Upgrade {
        /// Upgrade timestamp.
        upgraded_at: DateTime<Utc>,
    },
}
