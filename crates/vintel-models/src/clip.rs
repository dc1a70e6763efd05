//! Viral clip candidate models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::frame::Thumbnail;

/// Stable identifier for a scored window.
///
/// Derived only from the rounded start and the window length, so re-scoring
/// the same window always yields the same id.
pub fn clip_id(start_time: f64, length: f64) -> String {
    format!("clip-{}-{}", start_time.round() as i64, length.round() as i64)
}

/// A time window ranked for shareability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViralClipCandidate {
    /// Stable id, see [`clip_id`]
    pub id: String,

    /// Window start in seconds
    pub start_time: f64,

    /// Window end in seconds
    pub end_time: f64,

    /// Window length in seconds (one of the configured lengths)
    pub duration: f64,

    /// Composite score (0-100)
    pub virality_score: u32,

    /// Human-readable title
    pub label: String,

    /// Why this window scored well, strongest signals first
    pub reasons: Vec<String>,

    /// Preview image near the window start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

impl ViralClipCandidate {
    /// Seconds shared between this candidate and `other`.
    pub fn overlap_with(&self, other: &ViralClipCandidate) -> f64 {
        (self.end_time.min(other.end_time) - self.start_time.max(other.start_time)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(start: f64, duration: f64) -> ViralClipCandidate {
        ViralClipCandidate {
            id: clip_id(start, duration),
            start_time: start,
            end_time: start + duration,
            duration,
            virality_score: 50,
            label: "test".to_string(),
            reasons: Vec::new(),
            thumbnail: None,
        }
    }

    #[test]
    fn test_clip_id_is_stable() {
        assert_eq!(clip_id(7.5, 15.0), "clip-8-15");
        assert_eq!(clip_id(7.5, 15.0), clip_id(7.5, 15.0));
        assert_ne!(clip_id(0.0, 15.0), clip_id(0.0, 30.0));
    }

    #[test]
    fn test_overlap() {
        let a = candidate(0.0, 30.0);
        let b = candidate(20.0, 15.0);
        let c = candidate(40.0, 15.0);

        assert!((a.overlap_with(&b) - 10.0).abs() < f64::EPSILON);
        assert!((b.overlap_with(&a) - 10.0).abs() < f64::EPSILON);
        assert_eq!(a.overlap_with(&c), 0.0);
    }
}
