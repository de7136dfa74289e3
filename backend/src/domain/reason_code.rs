//! Reason codes owned by the core contract.
//!
//! These travel to clients under `details.code` of an [`Error`](super::Error)
//! (or of a delete warning) and are stable across releases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable reason code attached to core failures and warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    /// A points update was zero or negative.
    #[serde(rename = "E0601")]
    NonPositivePoints,
    /// A points update was not an integer number.
    #[serde(rename = "E0602")]
    InvalidPointsType,
    /// The section already holds the maximum number of components.
    #[serde(rename = "E1101")]
    SectionAtCapacity,
    /// An exercise was deleted while its section reference had drifted.
    #[serde(rename = "E1104")]
    DetachDrift,
}

impl ReasonCode {
    /// Wire representation, e.g. `E1101`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonPositivePoints => "E0601",
            Self::InvalidPointsType => "E0602",
            Self::SectionAtCapacity => "E1101",
            Self::DetachDrift => "E1104",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
