//! Plan, trial-grant, and consumption engine for VeilForge.
//!
//! This crate is the entitlement core of the platform:
//! - [`EntitlementRecord`] — the per-principal aggregate (plan + trial state)
//! - [`MemoryStore`] — transactional document store with per-key isolation
//! - [`ThrottleGuard`] — 60-second debounce on the trial-grant path
//! - [`EntitlementService`] — grant / consume / status / upgrade operations
//! - [`AnalyticsSink`] — best-effort event recording after committed transitions
//!
//! # Design Principles
//!
//! - **Single lifetime trial**: a trial is granted at most once per principal
//!   and consumed at most once, enforced inside store transactions
//! - **Premium bypass**: premium principals never touch trial state
//! - **Typed updates**: every mutation goes through [`EntitlementUpdate`],
//!   which enumerates exactly the fields an operation may touch
//! - **Injected capabilities**: store, clock, and analytics sink are passed at
//!   construction; nothing reaches for a global handle

mod analytics;
mod clock;
mod decision;
mod error;
mod record;
mod service;
mod store;
mod throttle;

pub use analytics::{AnalyticsEvent, AnalyticsSink, EventId, EventKind, MemorySink, TracingSink};
pub use clock::{Clock, ManualClock, SystemClock};
pub use decision::{decide_access, decide_grant, AccessDecision, GrantDecision, WATCH_THRESHOLD};
pub use error::{EntitlementError, EntitlementResult};
pub use record::{EntitlementRecord, EntitlementUpdate, FeatureConfig, TrialState};
pub use service::{
    security_potential, AccessOutcome, AccessReason, EntitlementService, EntitlementStatus,
    WatchOutcome,
};
pub use store::{MemoryStore, StoreError};
pub use throttle::{ThrottleGuard, WINDOW_MS};
