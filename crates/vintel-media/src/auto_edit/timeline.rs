//! Rebuilt timeline with silent spans removed.

use vintel_models::{SilentRegion, TimelineClip};

/// Complement of the silent regions, found by scanning the track in `step`
/// increments. A run is flushed when silence begins or the track ends.
pub fn rebuild_timeline(regions: &[SilentRegion], duration: f64, step: f64) -> Vec<TimelineClip> {
    if !(duration.is_finite() && duration > 0.0 && step > 0.0) {
        return Vec::new();
    }

    let mut clips = Vec::new();
    let mut run_start: Option<f64> = None;

    let mut flush = |start: f64, end: f64| {
        let end = end.min(duration);
        if end > start {
            clips.push(TimelineClip::new(format!("clip-{}", clips.len() + 1), start, end));
        }
    };

    let steps = (duration / step).ceil() as usize;
    for i in 0..steps {
        let t = i as f64 * step;
        if t >= duration {
            break;
        }
        let silent = regions.iter().any(|r| r.contains(t));

        match (silent, run_start) {
            (false, None) => run_start = Some(t),
            (true, Some(start)) => {
                flush(start, t);
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        flush(start, duration);
    }

    clips
}
