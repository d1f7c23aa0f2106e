//! Tags for gated features.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A capability whose access check consults plan + trial state.
///
/// Only multi-layer processing (the "Guardian Layer") is gated today. Parsing
/// rejects anything else, so an unknown tag fails before any store access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureTag {
    /// Multi-layer processing.
    #[serde(rename = "multiLayer")]
    MultiLayer,
}

impl FeatureTag {
    /// Wire name of the feature tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultiLayer => "multiLayer",
        }
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiLayer" => Ok(Self::MultiLayer),
            other => Err(Error::UnknownFeature(other.to_string())),
        }
    }
}
