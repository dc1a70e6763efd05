//! Aggregate analysis result.
//!
//! One `AnalysisResult` is produced per analysis run. It is owned by the
//! editor session that requested it and is replaced wholesale when the
//! source is analyzed again.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::audio::AudioSegment;
use crate::clip::ViralClipCandidate;
use crate::frame::FrameSample;
use crate::signals::{BeatMarker, SceneChangeEvent, SilentRegion};

/// Where the audio-derived signals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudioProvenance {
    /// Decoded from the media's audio track
    #[default]
    Decoded,
    /// Decoding failed; energies and waveform are random placeholders
    Synthetic,
}

impl AudioProvenance {
    /// Returns the provenance as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decoded => "decoded",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Everything the analyzer learned about one media source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Visual samples, ordered by time
    pub frames: Vec<FrameSample>,

    /// Detected shot boundaries
    pub scenes: Vec<SceneChangeEvent>,

    /// Audio energy buckets, ordered by time
    pub audio: Vec<AudioSegment>,

    /// Local energy peaks
    pub beats: Vec<BeatMarker>,

    /// Low-energy intervals of at least the minimum length
    pub silent_regions: Vec<SilentRegion>,

    /// Ranked, deduplicated clip candidates
    pub viral_clips: Vec<ViralClipCandidate>,

    /// Fixed-length amplitude summary for visualization
    pub waveform: Vec<f64>,

    /// Total media duration in seconds
    pub duration: f64,

    /// Whether audio signals are real or synthetic
    #[serde(default)]
    pub audio_provenance: AudioProvenance,
}

impl AnalysisResult {
    /// True when audio-derived signals are placeholders, not measurements.
    pub fn is_degraded(&self) -> bool {
        self.audio_provenance == AudioProvenance::Synthetic
    }

    /// Total seconds covered by silent regions.
    pub fn total_silence(&self) -> f64 {
        self.silent_regions.iter().map(SilentRegion::duration).sum()
    }

    /// Highest-ranked clip candidate, if any.
    pub fn top_clip(&self) -> Option<&ViralClipCandidate> {
        self.viral_clips.first()
    }
}
