#![deny(unreachable_patterns)]
//! Video intelligence and auto-edit pipeline.
//!
//! This crate provides:
//! - Frame sampling with brightness, contrast and motion statistics
//! - Audio energy bucketing with a synthetic fallback on decode failure
//! - Scene, beat and silence detection
//! - Sliding-window virality scoring of clip candidates
//! - A rule-based auto-editor (cuts, transitions, speed ramps, highlight reel)
//! - An FFmpeg-backed media source for local files
//! - Cancellation support via tokio

pub mod audio;
pub mod auto_edit;
pub mod cancel;
pub mod command;
pub mod config;
pub mod detectors;
pub mod error;
pub mod ffmpeg_source;
pub mod metrics;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod sampler;
pub mod scoring;
pub mod session;
pub mod source;

pub use audio::{AudioAnalysis, AudioSegmenter};
pub use auto_edit::AutoEditor;
pub use cancel::CancelSignal;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use config::{AnalysisConfig, AudioConfig, AutoEditConfig, DetectorConfig, SamplerConfig, ScoringConfig};
pub use error::{MediaError, MediaResult};
pub use ffmpeg_source::{FfmpegAudioDecoder, FfmpegSource};
pub use pipeline::VideoAnalyzer;
pub use probe::{probe_media, MediaInfo};
pub use progress::{AnalysisProgress, AnalysisStage, ProgressCallback};
pub use sampler::FrameSampler;
pub use scoring::{ScoringInput, ViralityScorer};
pub use session::{EditorSession, ExportSelection};
pub use source::{AudioDecoder, MediaSource, PcmAudio, RgbFrame};
