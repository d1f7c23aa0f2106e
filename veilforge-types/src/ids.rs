//! Identifier types for authenticated actors.
//!
//! Principal ids are opaque strings minted by the external identity provider.
//! They are stable for the lifetime of an account but carry no structure this
//! core may rely on, so they stay a string newtype rather than a UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable, opaque identifier for an authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Creates a principal id from an identity-provider subject string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PrincipalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PrincipalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl FromStr for PrincipalId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// An authenticated actor, as produced by the token verifier.
///
/// The email is display/record-only; all entitlement decisions key off `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identifier from the identity provider.
    pub id: PrincipalId,
    /// Optional email, recorded on first materialization.
    pub email: Option<String>,
}

impl Principal {
    /// Creates a principal with no email.
    #[must_use]
    pub fn new(id: impl Into<PrincipalId>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    /// Creates a principal with an email.
    #[must_use]
    pub fn with_email(id: impl Into<PrincipalId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Some(email.into()),
        }
    }
}
