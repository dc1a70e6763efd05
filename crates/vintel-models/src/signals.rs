//! Signals derived from frame and audio samples.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A detected shot boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SceneChangeEvent {
    /// Timestamp in seconds
    pub time: f64,
    /// Detection confidence (0.0-1.0)
    pub confidence: f64,
}

/// A local energy peak in the audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BeatMarker {
    /// Timestamp in seconds
    pub time: f64,
    /// Energy rise leading into the peak
    pub strength: f64,
}

/// A continuous interval of low audio energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SilentRegion {
    /// Start in seconds
    pub start: f64,
    /// End in seconds (always > start)
    pub end: f64,
}

impl SilentRegion {
    /// Length of the region in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` falls in `[start, end)`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Seconds of this region that fall inside `[start, end)`.
    pub fn overlap_with(&self, start: f64, end: f64) -> f64 {
        (self.end.min(end) - self.start.max(start)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_overlap() {
        let region = SilentRegion {
            start: 2.0,
            end: 5.0,
        };

        assert!((region.duration() - 3.0).abs() < f64::EPSILON);
        assert!((region.overlap_with(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
        assert!((region.overlap_with(3.0, 4.0) - 1.0).abs() < f64::EPSILON);
        assert_eq!(region.overlap_with(6.0, 10.0), 0.0);
    }

    #[test]
    fn test_region_contains_is_half_open() {
        let region = SilentRegion {
            start: 1.0,
            end: 2.0,
        };
        assert!(region.contains(1.0));
        assert!(region.contains(1.5));
        assert!(!region.contains(2.0));
    }
}
