//! Silent region detection.
//!
//! # State Machine
//!
//! ```text
//!                 segment is silent
//!     ┌──────────────────────────────────────┐
//!     │                                      ▼
//! ┌──────────┐                        ┌─────────────┐
//! │ Sounding │◄───────────────────────│ InSilence   │
//! └──────────┘   segment is sounding  └─────────────┘
//!                (emit run if >= min_silence_secs)
//! ```
//!
//! A run still open at the end of the track closes at
//! `last.time + interval`.

use vintel_models::{AudioSegment, SilentRegion};

use crate::config::DetectorConfig;

/// Tolerance for float sums of bucket intervals.
const DURATION_EPSILON: f64 = 1e-9;

enum State {
    Sounding,
    InSilence { start: f64 },
}

/// Merge consecutive silent buckets into regions of at least
/// `min_silence_secs`.
pub fn detect_silence(segments: &[AudioSegment], interval: f64, config: &DetectorConfig) -> Vec<SilentRegion> {
    let mut regions = Vec::new();
    let mut state = State::Sounding;

    let close = |start: f64, end: f64, regions: &mut Vec<SilentRegion>| {
        if end > start && end - start + DURATION_EPSILON >= config.min_silence_secs {
            regions.push(SilentRegion { start, end });
        }
    };

    for segment in segments {
        state = match (state, segment.is_silent) {
            (State::Sounding, true) => State::InSilence { start: segment.time },
            (State::InSilence { start }, false) => {
                close(start, segment.time, &mut regions);
                State::Sounding
            }
            (state, _) => state,
        };
    }

    if let (State::InSilence { start }, Some(last)) = (state, segments.last()) {
        close(start, last.time + interval, &mut regions);
    }

    regions
}
