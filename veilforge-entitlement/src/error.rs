//! Error types for the entitlement engine.

use crate::store::StoreError;
use thiserror::Error;

/// Entitlement-engine errors.
///
/// Contention is deliberately absent: the loser of a consumption race gets a
/// normal locked outcome, never an error.
#[derive(Debug, Error)]
pub enum EntitlementError {
    /// The persistence layer failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for entitlement operations.
pub type EntitlementResult<T> = Result<T, EntitlementError>;
