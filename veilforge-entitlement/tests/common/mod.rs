//! Shared test helpers for entitlement tests.

#![allow(dead_code)]

use std::sync::Arc;
use veilforge_entitlement::{
    EntitlementService, ManualClock, MemorySink, MemoryStore, ThrottleGuard,
};
use veilforge_types::Principal;

/// Fixed starting instant for the manual clock (2023-11-14T22:13:20Z).
pub const T0_MS: i64 = 1_700_000_000_000;

/// A service wired to in-memory capabilities, all reachable for assertions.
pub struct Harness {
    pub service: Arc<EntitlementService>,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<MemorySink>,
    pub clock: Arc<ManualClock>,
}

/// Builds a harness with the production 60s throttle window.
pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let clock = Arc::new(ManualClock::at_millis(T0_MS));
    let service = Arc::new(EntitlementService::new(
        store.clone(),
        ThrottleGuard::default(),
        sink.clone(),
        clock.clone(),
    ));
    Harness {
        service,
        store,
        sink,
        clock,
    }
}

pub fn alice() -> Principal {
    Principal::with_email("uid-alice", "alice@example.com")
}

pub fn bob() -> Principal {
    Principal::with_email("uid-bob", "bob@example.com")
}
