//! Metrics for analysis runs.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! embedding binary installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const ANALYSIS_RUNS_TOTAL: &str = "vintel_analysis_runs_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "vintel_analysis_duration_seconds";
    pub const AUDIO_FALLBACK_TOTAL: &str = "vintel_audio_fallback_total";
    pub const CLIP_CANDIDATES: &str = "vintel_clip_candidates";
}

/// Record a finished analysis run.
pub fn record_analysis_run(outcome: &str, duration_secs: f64, degraded: bool) {
    let labels = [
        ("outcome", outcome.to_string()),
        ("audio", if degraded { "synthetic" } else { "decoded" }.to_string()),
    ];

    counter!(names::ANALYSIS_RUNS_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a fallback to synthetic audio.
pub fn record_audio_fallback() {
    counter!(names::AUDIO_FALLBACK_TOTAL).increment(1);
}

/// Record how many clip candidates a run produced.
pub fn record_candidates(count: usize) {
    histogram!(names::CLIP_CANDIDATES).record(count as f64);
}
