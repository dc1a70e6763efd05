//! Audio energy buckets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// RMS energy of one fixed-length audio bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
    /// Bucket start in seconds
    pub time: f64,
    /// Root-mean-square amplitude of the bucket
    pub energy: f64,
    /// Energy fell below the silence threshold
    pub is_silent: bool,
}

impl AudioSegment {
    /// Build a segment, deriving `is_silent` from the given threshold.
    pub fn new(time: f64, energy: f64, silence_threshold: f64) -> Self {
        Self {
            time,
            energy,
            is_silent: energy < silence_threshold,
        }
    }
}
