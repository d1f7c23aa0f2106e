//! Core type definitions for VeilForge.
//!
//! This crate defines the fundamental types shared by the entitlement engine
//! and the HTTP server:
//! - Principal identifiers (opaque ids issued by the token verifier)
//! - The plan tier (`free` / `premium`)
//! - Gated feature tags
//!
//! Everything stateful (entitlement records, trial state, throttling) belongs
//! in `veilforge-entitlement`, not here.

mod feature;
mod ids;
mod plan;

pub use feature::FeatureTag;
pub use ids::{Principal, PrincipalId};
pub use plan::Plan;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown feature tag: {0}")]
    UnknownFeature(String),

    #[error("unknown plan: {0}")]
    UnknownPlan(String),
}
