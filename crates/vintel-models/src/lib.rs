//! Shared data models for the video intelligence pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Per-frame visual samples and per-bucket audio segments
//! - Derived signals (scene changes, beats, silent regions)
//! - Ranked viral clip candidates
//! - Auto-edit actions, rebuilt timelines and highlight reels
//! - Clip specs handed to the export step

pub mod analysis;
pub mod audio;
pub mod clip;
pub mod edit;
pub mod export;
pub mod frame;
pub mod signals;
pub mod timestamp;

// Re-export common types
pub use analysis::{AnalysisResult, AudioProvenance};
pub use audio::AudioSegment;
pub use clip::{clip_id, ViralClipCandidate};
pub use edit::{AutoEditResult, EditAction, EditActionType, EditIcon, HighlightReel, TimelineClip};
pub use export::ExportClipSpec;
pub use frame::{FrameSample, Thumbnail};
pub use signals::{BeatMarker, SceneChangeEvent, SilentRegion};
