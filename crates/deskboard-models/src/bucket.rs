//! Room capacity buckets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Fixed, non-overlapping capacity ranges.
///
/// Bounds are inclusive at both ends except for the open-ended top
/// bucket, which covers everything above 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapacityBucket {
    #[serde(rename = "1-5")]
    Small,
    #[serde(rename = "6-10")]
    Medium,
    #[serde(rename = "11-20")]
    Large,
    #[serde(rename = "20+")]
    Hall,
}

impl CapacityBucket {
    /// Every bucket, smallest first.
    pub const ALL: [CapacityBucket; 4] = [
        CapacityBucket::Small,
        CapacityBucket::Medium,
        CapacityBucket::Large,
        CapacityBucket::Hall,
    ];

    /// Selector label, e.g. `"6-10"`.
    pub fn label(&self) -> &'static str {
        match self {
            CapacityBucket::Small => "1-5",
            CapacityBucket::Medium => "6-10",
            CapacityBucket::Large => "11-20",
            CapacityBucket::Hall => "20+",
        }
    }

    /// Returns true if `capacity` falls in this bucket.
    pub fn contains(&self, capacity: u32) -> bool {
        match self {
            CapacityBucket::Small => (1..=5).contains(&capacity),
            CapacityBucket::Medium => (6..=10).contains(&capacity),
            CapacityBucket::Large => (11..=20).contains(&capacity),
            CapacityBucket::Hall => capacity > 20,
        }
    }

    /// The bucket `capacity` falls in; `None` for zero.
    pub fn for_capacity(capacity: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.contains(capacity))
    }
}

impl fmt::Display for CapacityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CapacityBucket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.label() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "capacity",
                value: s.to_string(),
            })
    }
}
