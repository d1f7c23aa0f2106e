//! The entitlement plan tier.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse entitlement tier for a principal.
///
/// Transitions are monotonic upward: `Free -> Premium` via the upgrade
/// operation only. No downgrade path exists in this core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Default tier for a freshly materialized account.
    #[default]
    Free,
    /// Paid tier; bypasses all trial gating.
    Premium,
}

impl Plan {
    /// Returns true for the premium tier.
    #[must_use]
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Premium)
    }

    /// Wire name of the plan (`free` / `premium`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            other => Err(Error::UnknownPlan(other.to_string())),
        }
    }
}
