//! Progress reporting for analysis runs.
//!
//! The analyzer emits coarse milestones through a callback so callers can
//! drive a progress bar without being coupled to how the run is staged.
//! Percentages are non-decreasing within a stage; nothing is promised across
//! stages beyond the final `Complete` at 100.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Pipeline stage being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    SamplingFrames,
    AnalyzingAudio,
    DetectingScenes,
    DetectingBeats,
    DetectingSilence,
    ScoringClips,
    Complete,
}

impl AnalysisStage {
    /// Human-readable stage label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SamplingFrames => "Sampling frames",
            Self::AnalyzingAudio => "Analyzing audio",
            Self::DetectingScenes => "Detecting scenes",
            Self::DetectingBeats => "Detecting beats",
            Self::DetectingSilence => "Detecting silence",
            Self::ScoringClips => "Scoring clips",
            Self::Complete => "Complete",
        }
    }
}

/// One progress update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisProgress {
    /// Current stage
    pub stage: AnalysisStage,
    /// Overall completion estimate (0-100)
    pub percent: f64,
}

impl AnalysisProgress {
    pub fn label(&self) -> &'static str {
        self.stage.label()
    }
}

/// Progress callback type.
pub type ProgressCallback = Arc<dyn Fn(AnalysisProgress) + Send + Sync>;

/// Forwards progress to an optional callback, clamping percentages so they
/// never move backwards within a stage.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    last: Option<AnalysisProgress>,
}

impl ProgressReporter {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            last: None,
        }
    }

    /// Report a milestone.
    pub fn report(&mut self, stage: AnalysisStage, percent: f64) {
        let mut percent = percent.clamp(0.0, 100.0);
        if let Some(last) = self.last {
            if last.stage == stage && percent < last.percent {
                percent = last.percent;
            }
        }

        let progress = AnalysisProgress { stage, percent };
        self.last = Some(progress);

        if let Some(ref callback) = self.callback {
            callback(progress);
        }
    }

    /// Report progress through a stage spanning `[from, to]` percent.
    pub fn report_fraction(&mut self, stage: AnalysisStage, from: f64, to: f64, done: usize, total: usize) {
        let fraction = if total == 0 {
            1.0
        } else {
            done as f64 / total as f64
        };
        self.report(stage, from + (to - from) * fraction.min(1.0));
    }

    /// Last reported update, if any.
    pub fn last(&self) -> Option<AnalysisProgress> {
        self.last
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("has_callback", &self.callback.is_some())
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording() -> (ProgressCallback, Arc<Mutex<Vec<AnalysisProgress>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
        (callback, seen)
    }

    #[test]
    fn test_percent_never_decreases_within_stage() {
        let (callback, seen) = recording();
        let mut reporter = ProgressReporter::new(Some(callback));

        reporter.report(AnalysisStage::SamplingFrames, 20.0);
        reporter.report(AnalysisStage::SamplingFrames, 10.0);
        reporter.report(AnalysisStage::Complete, 100.0);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!((seen[1].percent - 20.0).abs() < f64::EPSILON);
        assert_eq!(seen[2].label(), "Complete");
    }

    #[test]
    fn test_report_fraction() {
        let (callback, seen) = recording();
        let mut reporter = ProgressReporter::new(Some(callback));

        reporter.report_fraction(AnalysisStage::SamplingFrames, 0.0, 50.0, 5, 10);
        reporter.report_fraction(AnalysisStage::SamplingFrames, 0.0, 50.0, 0, 0);

        let seen = seen.lock().unwrap();
        assert!((seen[0].percent - 25.0).abs() < f64::EPSILON);
        assert!((seen[1].percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_without_callback() {
        let mut reporter = ProgressReporter::default();
        reporter.report(AnalysisStage::ScoringClips, 150.0);
        assert!((reporter.last().unwrap().percent - 100.0).abs() < f64::EPSILON);
    }
}
