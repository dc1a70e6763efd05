//! Configuration for the analysis pipeline.
//!
//! Every heuristic constant lives here with its default. The defaults are
//! tuned for short-form social clips cut from 1-30 minute sources.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};

/// Frame sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Seconds between sampled frames.
    pub frame_interval: f64,

    /// Width of the analysis raster. Frames are downscaled to this before
    /// any pixel statistics are computed.
    pub raster_width: u32,

    /// Height of the analysis raster.
    pub raster_height: u32,

    /// Compare every Nth pixel when computing motion.
    pub motion_stride: usize,

    /// Attach a thumbnail to every Nth frame (0 disables thumbnails).
    pub thumbnail_every: usize,

    /// JPEG quality for thumbnails (1-100).
    pub thumbnail_quality: u8,

    /// Upper bound on a single seek. A seek that never completes is fatal.
    pub seek_timeout_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            frame_interval: 0.5,
            raster_width: 160,
            raster_height: 90,
            motion_stride: 4,
            thumbnail_every: 5,
            thumbnail_quality: 40,
            seek_timeout_ms: 10_000,
        }
    }
}

impl SamplerConfig {
    pub fn seek_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_timeout_ms)
    }
}

/// Audio decoding and bucketing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Bucket length in seconds. Must equal the frame interval so audio and
    /// video samples line up; `validate` rejects a mismatch.
    pub segment_interval: f64,

    /// RMS energy below this marks a bucket as silent.
    pub silence_threshold: f64,

    /// Number of points in the waveform summary.
    pub waveform_points: usize,

    /// Sample rate requested from the decoder.
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            segment_interval: 0.5,
            silence_threshold: 0.01,
            waveform_points: 1000,
            sample_rate: 22_050,
        }
    }
}

/// Scene, beat and silence detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Scene threshold as a multiple of mean nonzero motion.
    pub scene_threshold_multiplier: f64,

    /// Minimum energy rise into a peak for it to count as a beat.
    pub beat_min_rise: f64,

    /// Minimum length of a silent region in seconds.
    pub min_silence_secs: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scene_threshold_multiplier: 2.5,
            beat_min_rise: 0.03,
            min_silence_secs: 1.0,
        }
    }
}

/// Virality scoring parameters.
///
/// Component caps sum to 100, which bounds the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Candidate window lengths in seconds.
    pub clip_lengths: Vec<f64>,

    /// Smallest step between window starts.
    pub min_window_step: f64,

    /// Window step is `length / window_step_divisor` (at least `min_window_step`).
    pub window_step_divisor: f64,

    /// Windows must score strictly above this to be kept.
    pub min_score: f64,

    /// Maximum number of candidates returned.
    pub max_candidates: usize,

    /// A candidate is dropped if it overlaps a better one by more than this
    /// fraction of its own duration.
    pub max_overlap_ratio: f64,

    pub energy_weight: f64,
    pub energy_cap: f64,
    pub motion_weight: f64,
    pub motion_cap: f64,
    pub scene_weight: f64,
    pub scene_cap: f64,
    pub beat_weight: f64,
    pub beat_cap: f64,
    pub silence_weight: f64,
    pub silence_cap: f64,

    /// Energy sub-score above which "High audio energy" is reported.
    pub reason_energy_score: f64,
    /// Motion sub-score above which "Dynamic visuals" is reported.
    pub reason_motion_score: f64,
    /// Scene count above which "Multiple scene changes" is reported.
    pub reason_scene_count: usize,
    /// Beat count above which "Strong rhythm" is reported.
    pub reason_beat_count: usize,
    /// Silence fraction below which "Continuous audio" is reported.
    pub reason_silence_fraction: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            clip_lengths: vec![15.0, 30.0, 60.0],
            min_window_step: 2.0,
            window_step_divisor: 4.0,
            min_score: 35.0,
            max_candidates: 10,
            max_overlap_ratio: 0.5,
            energy_weight: 100.0,
            energy_cap: 30.0,
            motion_weight: 5.0,
            motion_cap: 25.0,
            scene_weight: 5.0,
            scene_cap: 15.0,
            beat_weight: 3.0,
            beat_cap: 15.0,
            silence_weight: 30.0,
            silence_cap: 15.0,
            reason_energy_score: 15.0,
            reason_motion_score: 12.0,
            reason_scene_count: 2,
            reason_beat_count: 3,
            reason_silence_fraction: 0.1,
        }
    }
}

/// Auto-editor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoEditConfig {
    /// Confidence attached to silence cuts.
    pub cut_confidence: f64,

    /// Scenes above this confidence get a transition.
    pub transition_min_confidence: f64,

    /// Transition spans this many seconds either side of the scene change.
    pub transition_half_width: f64,

    /// Non-silent buckets below this fraction of mean non-silent energy are
    /// speed-up candidates.
    pub low_energy_ratio: f64,

    /// Playback rate for speed actions.
    pub speed_factor: f64,

    /// Minimum span of a merged low-energy run.
    pub speed_min_run: f64,

    /// Low-energy buckets at most this far apart are merged into one run.
    pub speed_max_gap: f64,

    /// Confidence attached to speed actions.
    pub speed_confidence: f64,

    /// Scan step used when rebuilding the clip list.
    pub timeline_step: f64,

    /// Highlight reel duration budget in seconds.
    pub reel_budget: f64,

    /// Beats weaker than this get no split action.
    pub beat_min_strength: f64,

    /// Split confidence is `strength * beat_confidence_scale`, capped at 1.
    pub beat_confidence_scale: f64,
}

impl Default for AutoEditConfig {
    fn default() -> Self {
        Self {
            cut_confidence: 0.9,
            transition_min_confidence: 0.5,
            transition_half_width: 0.2,
            low_energy_ratio: 0.4,
            speed_factor: 1.5,
            speed_min_run: 1.5,
            speed_max_gap: 1.0,
            speed_confidence: 0.7,
            timeline_step: 0.5,
            reel_budget: 60.0,
            beat_min_strength: 0.05,
            beat_confidence_scale: 10.0,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sampler: SamplerConfig,
    pub audio: AudioConfig,
    pub detectors: DetectorConfig,
    pub scoring: ScoringConfig,
    pub auto_edit: AutoEditConfig,

    /// Timeout for each FFmpeg/FFprobe invocation (seconds).
    pub ffmpeg_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            audio: AudioConfig::default(),
            detectors: DetectorConfig::default(),
            scoring: ScoringConfig::default(),
            auto_edit: AutoEditConfig::default(),
            ffmpeg_timeout_secs: 120,
        }
    }
}

impl AnalysisConfig {
    /// Coarser sampling for quick previews of long sources.
    pub fn fast() -> Self {
        let mut config = Self::default();
        config.sampler.frame_interval = 1.0;
        config.sampler.raster_width = 80;
        config.sampler.raster_height = 45;
        config.sampler.thumbnail_every = 10;
        config.audio.segment_interval = 1.0;
        config
    }

    /// Defaults with `VINTEL_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VINTEL_*` environment overrides on top of this config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse::<f64>("VINTEL_FRAME_INTERVAL") {
            self = self.with_frame_interval(v);
        }
        if let Some(v) = env_parse::<u32>("VINTEL_RASTER_WIDTH") {
            self.sampler.raster_width = v.max(1);
        }
        if let Some(v) = env_parse::<u32>("VINTEL_RASTER_HEIGHT") {
            self.sampler.raster_height = v.max(1);
        }
        if let Some(v) = env_parse::<u64>("VINTEL_SEEK_TIMEOUT_MS") {
            self.sampler.seek_timeout_ms = v;
        }
        if let Some(v) = env_parse::<f64>("VINTEL_REEL_BUDGET") {
            self = self.with_reel_budget(v);
        }
        if let Some(v) = env_parse::<u64>("VINTEL_FFMPEG_TIMEOUT") {
            self.ffmpeg_timeout_secs = v;
        }
        self
    }

    /// Builder-style setter for the sampling interval (frames and audio).
    pub fn with_frame_interval(mut self, secs: f64) -> Self {
        let secs = secs.max(0.05);
        self.sampler.frame_interval = secs;
        self.audio.segment_interval = secs;
        self
    }

    /// Builder-style setter for candidate clip lengths.
    pub fn with_clip_lengths(mut self, lengths: impl Into<Vec<f64>>) -> Self {
        self.scoring.clip_lengths = lengths.into();
        self
    }

    /// Builder-style setter for the highlight reel budget.
    pub fn with_reel_budget(mut self, secs: f64) -> Self {
        self.auto_edit.reel_budget = secs.max(0.0);
        self
    }

    /// Builder-style setter for the seek timeout.
    pub fn with_seek_timeout(mut self, timeout: Duration) -> Self {
        self.sampler.seek_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> MediaResult<()> {
        if !(self.sampler.frame_interval.is_finite() && self.sampler.frame_interval > 0.0) {
            return Err(MediaError::invalid_config("frame_interval must be > 0"));
        }
        if !(self.audio.segment_interval.is_finite() && self.audio.segment_interval > 0.0) {
            return Err(MediaError::invalid_config("segment_interval must be > 0"));
        }
        if self.sampler.raster_width == 0 || self.sampler.raster_height == 0 {
            return Err(MediaError::invalid_config("raster size must be non-zero"));
        }
        if (self.sampler.frame_interval - self.audio.segment_interval).abs() > 1e-9 {
            return Err(MediaError::invalid_config(format!(
                "audio segment_interval ({}) must match frame_interval ({})",
                self.audio.segment_interval, self.sampler.frame_interval
            )));
        }
        if self.audio.sample_rate == 0 {
            return Err(MediaError::invalid_config("sample_rate must be non-zero"));
        }
        if self.scoring.clip_lengths.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
            return Err(MediaError::invalid_config("clip lengths must be > 0"));
        }
        if !(self.auto_edit.timeline_step.is_finite() && self.auto_edit.timeline_step > 0.0) {
            return Err(MediaError::invalid_config("timeline_step must be > 0"));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert!((config.sampler.frame_interval - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.sampler.raster_width, 160);
        assert_eq!(config.sampler.raster_height, 90);
        assert!((config.audio.silence_threshold - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.audio.waveform_points, 1000);
        assert_eq!(config.scoring.clip_lengths, vec![15.0, 30.0, 60.0]);
        assert!((config.auto_edit.reel_budget - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.ffmpeg_timeout_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_score_caps_sum_to_100() {
        let s = ScoringConfig::default();
        let total = s.energy_cap + s.motion_cap + s.scene_cap + s.beat_cap + s.silence_cap;
        assert!((total - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AnalysisConfig::default()
            .with_frame_interval(0.25)
            .with_reel_budget(30.0)
            .with_clip_lengths(vec![10.0]);

        assert!((config.sampler.frame_interval - 0.25).abs() < f64::EPSILON);
        assert!((config.audio.segment_interval - 0.25).abs() < f64::EPSILON);
        assert!((config.auto_edit.reel_budget - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.scoring.clip_lengths, vec![10.0]);
    }

    #[test]
    fn test_interval_clamping() {
        let config = AnalysisConfig::default().with_frame_interval(0.0);
        assert!((config.sampler.frame_interval - 0.05).abs() < f64::EPSILON);

        let config = AnalysisConfig::default().with_reel_budget(-5.0);
        assert_eq!(config.auto_edit.reel_budget, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_lengths() {
        let config = AnalysisConfig::default().with_clip_lengths(vec![15.0, -1.0]);
        assert!(matches!(config.validate(), Err(MediaError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "sampler": {{ "frame_interval": 1.0 }}, "audio": {{ "segment_interval": 1.0 }}, "auto_edit": {{ "reel_budget": 45.0 }} }}"#
        )
        .unwrap();

        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert!((config.sampler.frame_interval - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.sampler.raster_width, 160);
        assert!((config.auto_edit.reel_budget - 45.0).abs() < f64::EPSILON);
        assert_eq!(config.scoring.max_candidates, 10);
        assert_eq!(config.ffmpeg_timeout_secs, 120);
    }

    #[test]
    fn test_misaligned_intervals_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.audio.segment_interval = 1.0;
        assert!(matches!(config.validate(), Err(MediaError::InvalidConfig(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sampler": {{ "frame_interval": 0.25 }} }}"#).unwrap();
        assert!(matches!(
            AnalysisConfig::from_json_file(file.path()),
            Err(MediaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_json_file() {
        let result = AnalysisConfig::from_json_file("/nonexistent/vintel.json");
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }

    #[test]
    fn test_fast_preset_is_coarser() {
        let fast = AnalysisConfig::fast();
        let default = AnalysisConfig::default();
        assert!(fast.sampler.frame_interval > default.sampler.frame_interval);
        assert!(fast.sampler.raster_width < default.sampler.raster_width);
        assert!(fast.validate().is_ok());
    }
}
