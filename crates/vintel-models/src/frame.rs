//! Per-frame visual samples.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Low-fidelity preview image captured while sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Encoded image as a `data:` URL
    pub data_url: String,
}

/// Visual statistics for one sampled frame.
///
/// Samples are produced at a fixed interval starting at 0 and are never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameSample {
    /// Timestamp in seconds
    pub time: f64,

    /// Luma-weighted mean brightness (0.0-1.0)
    pub brightness: f64,

    /// RMS luma deviation from the mean, normalized (0.0-1.0)
    pub contrast: f64,

    /// Mean absolute pixel difference vs. the previous sample (0.0-1.0)
    pub motion_delta: f64,

    /// Preview image, captured every few frames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

impl FrameSample {
    /// Returns true if this frame differs from its predecessor at all.
    pub fn has_motion(&self) -> bool {
        self.motion_delta > 0.0
    }
}
