//! End-to-end analysis pipeline.
//!
//! One run is a strict linear sequence:
//!
//! ```text
//! sample frames -> segment audio -> detect scenes/beats/silence -> score clips
//! ```
//!
//! Any failure aborts the run with no partial result, except audio decoding
//! which degrades to synthetic data (see [`crate::audio`]).

use std::time::Instant;

use tracing::{info, info_span, warn, Instrument};
use vintel_models::AnalysisResult;

use crate::audio::AudioSegmenter;
use crate::cancel::CancelSignal;
use crate::config::AnalysisConfig;
use crate::detectors::{detect_beats, detect_scenes, detect_silence};
use crate::error::{MediaError, MediaResult};
use crate::metrics;
use crate::progress::{AnalysisProgress, AnalysisStage, ProgressCallback, ProgressReporter};
use crate::sampler::FrameSampler;
use crate::scoring::{ScoringInput, ViralityScorer};
use crate::source::{AudioDecoder, MediaSource};

/// Check a source-reported duration before any work starts.
pub fn validate_duration(duration: Option<f64>) -> MediaResult<f64> {
    match duration {
        None => Err(MediaError::invalid_duration("source reports no duration")),
        Some(d) if !d.is_finite() => Err(MediaError::invalid_duration(format!(
            "source duration is not finite ({d})"
        ))),
        Some(d) if d <= 0.0 => Err(MediaError::invalid_duration(format!(
            "source duration must be positive, got {d}"
        ))),
        Some(d) => Ok(d),
    }
}

/// Runs the analysis pipeline against a media source.
#[derive(Clone, Default)]
pub struct VideoAnalyzer {
    config: AnalysisConfig,
    progress: Option<ProgressCallback>,
    cancel: CancelSignal,
}

impl VideoAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            progress: None,
            cancel: CancelSignal::none(),
        }
    }

    /// Receive stage/percent updates during a run.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(AnalysisProgress) + Send + Sync + 'static,
    {
        self.progress = Some(std::sync::Arc::new(callback));
        self
    }

    /// Share an existing progress callback.
    pub fn with_progress_callback(mut self, callback: Option<ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `source`, decoding its audio with `decoder`.
    ///
    /// The source's playback position is driven by the sampler for the
    /// whole run.
    pub async fn analyze<S, D>(&self, source: &mut S, decoder: &D) -> MediaResult<AnalysisResult>
    where
        S: MediaSource + ?Sized,
        D: AudioDecoder + ?Sized,
    {
        let started = Instant::now();
        let span = info_span!("analysis", source = source.id());

        let result = self.run(source, decoder).instrument(span).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(analysis) => {
                metrics::record_analysis_run("ok", elapsed, analysis.is_degraded());
            }
            Err(MediaError::Cancelled) => {
                info!(elapsed_secs = format!("{:.2}", elapsed), "Analysis cancelled");
                metrics::record_analysis_run("cancelled", elapsed, false);
            }
            Err(e) => {
                warn!(error = %e, elapsed_secs = format!("{:.2}", elapsed), "Analysis failed");
                metrics::record_analysis_run("failed", elapsed, false);
            }
        }

        result
    }

    async fn run<S, D>(&self, source: &mut S, decoder: &D) -> MediaResult<AnalysisResult>
    where
        S: MediaSource + ?Sized,
        D: AudioDecoder + ?Sized,
    {
        self.config.validate()?;
        let duration = validate_duration(source.duration())?;
        let cancel = &self.cancel;
        let mut progress = ProgressReporter::new(self.progress.clone());

        info!(duration, interval = self.config.sampler.frame_interval, "Starting analysis");
        cancel.check()?;

        let frames = FrameSampler::new(self.config.sampler.clone())
            .sample(source, duration, cancel, &mut progress)
            .await?;

        let audio = AudioSegmenter::new(self.config.audio.clone())
            .analyze(&*source, decoder, duration, cancel, &mut progress)
            .await?;

        cancel.check()?;
        let detectors = &self.config.detectors;

        progress.report(AnalysisStage::DetectingScenes, 75.0);
        let scenes = detect_scenes(&frames, detectors);

        progress.report(AnalysisStage::DetectingBeats, 80.0);
        let beats = detect_beats(&audio.segments, detectors);

        progress.report(AnalysisStage::DetectingSilence, 85.0);
        let silent_regions = detect_silence(&audio.segments, self.config.audio.segment_interval, detectors);

        cancel.check()?;
        progress.report(AnalysisStage::ScoringClips, 90.0);
        let viral_clips = ViralityScorer::new(self.config.scoring.clone()).score(&ScoringInput {
            frames: &frames,
            audio: &audio.segments,
            scenes: &scenes,
            beats: &beats,
            silent_regions: &silent_regions,
            duration,
        });
        metrics::record_candidates(viral_clips.len());

        progress.report(AnalysisStage::Complete, 100.0);

        info!(
            frames = frames.len(),
            scenes = scenes.len(),
            beats = beats.len(),
            silent_regions = silent_regions.len(),
            clips = viral_clips.len(),
            audio = audio.provenance.as_str(),
            "Analysis complete"
        );

        Ok(AnalysisResult {
            frames,
            scenes,
            audio: audio.segments,
            beats,
            silent_regions,
            viral_clips,
            waveform: audio.waveform,
            duration,
            audio_provenance: audio.provenance,
        })
    }
}

impl std::fmt::Debug for VideoAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoAnalyzer")
            .field("config", &self.config)
            .field("has_progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_duration() {
        assert!((validate_duration(Some(12.5)).unwrap() - 12.5).abs() < f64::EPSILON);

        for bad in [None, Some(f64::NAN), Some(f64::INFINITY), Some(0.0), Some(-1.0)] {
            assert!(matches!(
                validate_duration(bad),
                Err(MediaError::InvalidDuration(_))
            ));
        }
    }
}
