//! Clip specs consumed by the external export step.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::edit::TimelineClip;

/// One clip to encode: which source, where to start, how long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportClipSpec {
    /// Timeline clip id
    pub clip_id: String,
    /// Source handle the clip is cut from
    pub source: String,
    /// In-point in seconds
    pub in_point: f64,
    /// Length in seconds
    pub duration: f64,
    /// Ask the encoder to strip a watermark overlay
    #[serde(default)]
    pub remove_watermark: bool,
}

impl ExportClipSpec {
    /// Build a spec for a timeline clip.
    pub fn from_clip(clip: &TimelineClip, source: impl Into<String>, remove_watermark: bool) -> Self {
        Self {
            clip_id: clip.id.clone(),
            source: source.into(),
            in_point: clip.start_time,
            duration: clip.duration,
            remove_watermark,
        }
    }
}
