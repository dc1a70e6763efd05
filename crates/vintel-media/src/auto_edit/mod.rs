//! Rule-based auto-editor.
//!
//! Turns a finished [`AnalysisResult`] into concrete timeline edits:
//! - silence cuts, scene transitions and low-energy speed ramps
//! - a rebuilt clip list with silent spans removed
//! - a duration-bounded highlight reel of the best candidates
//!
//! Beat-synchronized split points are a separate entry point
//! ([`AutoEditor::beat_sync_actions`]).

mod actions;
mod reel;
mod timeline;

pub use actions::{beat_splits, scene_transitions, silence_cuts, speed_ramps};
pub use reel::build_highlight_reel;
pub use timeline::rebuild_timeline;

use tracing::info;
use vintel_models::{AnalysisResult, AutoEditResult, EditAction};

use crate::config::{AnalysisConfig, AutoEditConfig};

/// Derives edits from an analysis result.
#[derive(Debug, Clone)]
pub struct AutoEditor {
    config: AutoEditConfig,
    segment_interval: f64,
}

impl AutoEditor {
    /// `segment_interval` is the audio bucket length the result was
    /// produced with.
    pub fn new(config: AutoEditConfig, segment_interval: f64) -> Self {
        Self {
            config,
            segment_interval,
        }
    }

    /// Override the highlight reel budget.
    pub fn with_reel_budget(mut self, secs: f64) -> Self {
        self.config.reel_budget = secs.max(0.0);
        self
    }

    /// Run every rule over `analysis`.
    pub fn run(&self, analysis: &AnalysisResult) -> AutoEditResult {
        let config = &self.config;
        let duration = analysis.duration;

        let mut actions = silence_cuts(&analysis.silent_regions, config);
        actions.extend(scene_transitions(&analysis.scenes, duration, config));
        actions.extend(speed_ramps(
            &analysis.audio,
            self.segment_interval,
            duration,
            config,
        ));
        // Stable, so same-start actions keep rule order.
        actions.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let clips = rebuild_timeline(&analysis.silent_regions, duration, config.timeline_step);
        let highlight_reel = build_highlight_reel(&analysis.viral_clips, config.reel_budget);

        info!(
            actions = actions.len(),
            clips = clips.len(),
            reel_clips = highlight_reel.clips.len(),
            reel_secs = format!("{:.1}", highlight_reel.total_duration),
            degraded = analysis.is_degraded(),
            "Auto-edit complete"
        );

        AutoEditResult {
            clips,
            actions,
            highlight_reel,
        }
    }

    /// Split points on strong beats only.
    pub fn beat_sync_actions(&self, analysis: &AnalysisResult) -> Vec<EditAction> {
        beat_splits(&analysis.beats, &self.config)
    }
}

impl From<&AnalysisConfig> for AutoEditor {
    fn from(config: &AnalysisConfig) -> Self {
        Self::new(config.auto_edit.clone(), config.audio.segment_interval)
    }
}
