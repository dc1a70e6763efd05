//! Edit actions derived directly from detector output.

use vintel_models::timestamp::{format_clock, format_span};
use vintel_models::{AudioSegment, BeatMarker, EditAction, EditActionType, EditIcon, SceneChangeEvent, SilentRegion};

use crate::config::AutoEditConfig;

/// Tolerance for float sums of bucket intervals.
const SPAN_EPSILON: f64 = 1e-9;

/// One `cut` per silent region.
pub fn silence_cuts(regions: &[SilentRegion], config: &AutoEditConfig) -> Vec<EditAction> {
    regions
        .iter()
        .map(|r| EditAction {
            action_type: EditActionType::Cut,
            start_time: r.start,
            end_time: r.end,
            label: format!("Remove silence ({})", format_span(r.duration())),
            confidence: config.cut_confidence,
            icon: EditIcon::Scissors,
            speed: None,
        })
        .collect()
}

/// One `transition` around every confident scene change, clamped to the
/// track.
pub fn scene_transitions(scenes: &[SceneChangeEvent], duration: f64, config: &AutoEditConfig) -> Vec<EditAction> {
    scenes
        .iter()
        .filter(|s| s.confidence > config.transition_min_confidence)
        .map(|s| EditAction {
            action_type: EditActionType::Transition,
            start_time: (s.time - config.transition_half_width).max(0.0),
            end_time: (s.time + config.transition_half_width).min(duration),
            label: format!("Transition at {}", format_clock(s.time)),
            confidence: s.confidence,
            icon: EditIcon::Sparkles,
            speed: None,
        })
        .collect()
}

/// `speed` actions over sustained low-energy, non-silent stretches.
///
/// Buckets below `low_energy_ratio` of the mean non-silent energy are
/// merged into runs while consecutive bucket times are at most
/// `speed_max_gap` apart. A run covers `[first.time, last.time + interval]`
/// and is kept when that span reaches `speed_min_run`.
pub fn speed_ramps(audio: &[AudioSegment], interval: f64, duration: f64, config: &AutoEditConfig) -> Vec<EditAction> {
    let sounding: Vec<&AudioSegment> = audio.iter().filter(|s| !s.is_silent).collect();
    if sounding.is_empty() {
        return Vec::new();
    }

    let mean = sounding.iter().map(|s| s.energy).sum::<f64>() / sounding.len() as f64;
    let threshold = mean * config.low_energy_ratio;

    let mut actions = Vec::new();
    let mut run: Option<(f64, f64)> = None;

    let flush = |first: f64, last: f64, actions: &mut Vec<EditAction>| {
        let start = first;
        let end = (last + interval).min(duration);
        if end - start + SPAN_EPSILON >= config.speed_min_run {
            actions.push(EditAction {
                action_type: EditActionType::Speed,
                start_time: start,
                end_time: end,
                label: format!("Speed up {}x ({})", config.speed_factor, format_span(end - start)),
                confidence: config.speed_confidence,
                icon: EditIcon::Gauge,
                speed: Some(config.speed_factor),
            });
        }
    };

    for segment in sounding.iter().filter(|s| s.energy < threshold) {
        run = match run {
            Some((first, last)) if segment.time - last <= config.speed_max_gap + SPAN_EPSILON => {
                Some((first, segment.time))
            }
            Some((first, last)) => {
                flush(first, last, &mut actions);
                Some((segment.time, segment.time))
            }
            None => Some((segment.time, segment.time)),
        };
    }
    if let Some((first, last)) = run {
        flush(first, last, &mut actions);
    }

    actions
}

/// One `split` at every beat strong enough to cut on.
pub fn beat_splits(beats: &[BeatMarker], config: &AutoEditConfig) -> Vec<EditAction> {
    beats
        .iter()
        .filter(|b| b.strength > config.beat_min_strength)
        .map(|b| EditAction {
            action_type: EditActionType::Split,
            start_time: b.time,
            end_time: b.time,
            label: format!("Cut on beat at {}", format_clock(b.time)),
            confidence: (b.strength * config.beat_confidence_scale).min(1.0),
            icon: EditIcon::Music,
            speed: None,
        })
        .collect()
}
