//! Beat detection from the audio energy envelope.
//!
//! A beat is a local energy maximum with a minimum rise: segment `i` is a
//! beat when `e[i] - e[i-1] > min_rise` and `e[i+1] < e[i]`. No tempo
//! tracking.

use vintel_models::{AudioSegment, BeatMarker};

use crate::config::DetectorConfig;

/// Detect beats in a bucketed audio track.
pub fn detect_beats(segments: &[AudioSegment], config: &DetectorConfig) -> Vec<BeatMarker> {
    segments
        .windows(3)
        .filter_map(|w| {
            let rise = w[1].energy - w[0].energy;
            let fall = w[2].energy - w[1].energy;
            (rise > config.beat_min_rise && fall < 0.0).then(|| BeatMarker {
                time: w[1].time,
                strength: rise,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(energies: &[f64]) -> Vec<AudioSegment> {
        energies
            .iter()
            .enumerate()
            .map(|(i, &e)| AudioSegment::new(i as f64 * 0.5, e, 0.01))
            .collect()
    }

    #[test]
    fn test_clean_peak() {
        let mut energies = vec![0.4; 10];
        energies[4] = 0.5;

        let beats = detect_beats(&segments(&energies), &DetectorConfig::default());

        assert_eq!(beats.len(), 1);
        assert!((beats[0].time - 2.0).abs() < 1e-9);
        assert!((beats[0].strength - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_small_rise_is_ignored() {
        let energies = [0.40, 0.42, 0.40, 0.41, 0.40];
        assert!(detect_beats(&segments(&energies), &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn test_plateau_is_not_a_peak() {
        // Rises then holds: no immediate fall after the rise.
        let energies = [0.1, 0.3, 0.3, 0.1];
        assert!(detect_beats(&segments(&energies), &DetectorConfig::default()).is_empty());
    }

    #[test]
    fn test_short_tracks() {
        let config = DetectorConfig::default();
        assert!(detect_beats(&[], &config).is_empty());
        assert!(detect_beats(&segments(&[0.1, 0.5]), &config).is_empty());
    }

    #[test]
    fn test_edges_are_never_beats() {
        let energies = [0.9, 0.1, 0.1, 0.9];
        assert!(detect_beats(&segments(&energies), &DetectorConfig::default()).is_empty());
    }
}
