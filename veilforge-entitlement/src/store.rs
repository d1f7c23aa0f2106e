//! Transactional per-principal document store.
//!
//! The engine treats persistence as a generic keyed document store with
//! atomic read-modify-write transactions. This in-memory implementation backs
//! the demo platform; a durable backend would keep the same contract.
//!
//! Isolation guarantee: two concurrent transactions against the same
//! principal serialize, so one observes the other's committed state and never
//! the shared pre-state. That is the sole correctness mechanism behind
//! exactly-once trial consumption.

use crate::record::EntitlementRecord;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use veilforge_types::PrincipalId;

/// Failures surfaced by the persistence layer.
///
/// The in-memory engine cannot actually fail, but callers are written against
/// a fallible document store so a durable backend can slot in.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend I/O failure.
    #[error("storage I/O failure: {0}")]
    Io(String),

    /// Stored document could not be decoded.
    #[error("corrupt record for principal {0}")]
    Corrupt(PrincipalId),
}

/// In-memory entitlement store with transactional read-modify-write.
///
/// Records are materialized lazily inside the transaction's critical section,
/// so initialization can never race with a mutation. Records are never
/// deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<PrincipalId, EntitlementRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the record for a principal, if it exists.
    ///
    /// Read-only; display paths that tolerate slightly stale state use this
    /// instead of a transaction.
    pub async fn get(&self, id: &PrincipalId) -> Result<Option<EntitlementRecord>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.get(id).cloned())
    }

    /// Runs `f` against the current record inside a transaction.
    ///
    /// If no record exists, `init()` materializes one first, inside the same
    /// critical section, so the default document commits atomically with
    /// whatever `f` writes. Mutations made by `f` are visible to later
    /// transactions the moment this call returns.
    pub async fn transact<T, I, F>(
        &self,
        id: &PrincipalId,
        init: I,
        f: F,
    ) -> Result<T, StoreError>
    where
        I: FnOnce() -> EntitlementRecord,
        F: FnOnce(&mut EntitlementRecord) -> T,
    {
        let mut records = self.records.lock().await;
        let record = records.entry(id.clone()).or_insert_with(init);
        Ok(f(record))
    }

    /// Number of materialized records. Diagnostic only.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// True if no record has been materialized yet.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}
