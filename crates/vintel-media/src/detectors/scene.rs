//! Scene change detection from motion spikes.
//!
//! # Algorithm
//! 1. Average the motion delta over frames that moved at all
//! 2. Threshold = multiplier (default 2.5) x that average
//! 3. Every frame above the threshold is a scene change with
//!    `confidence = min(1, motion / (2 * threshold))`

use tracing::debug;
use vintel_models::{FrameSample, SceneChangeEvent};

use crate::config::DetectorConfig;

/// Detect scene changes in a sampled frame sequence.
pub fn detect_scenes(frames: &[FrameSample], config: &DetectorConfig) -> Vec<SceneChangeEvent> {
    let (sum, moving) = frames
        .iter()
        .filter(|f| f.has_motion())
        .fold((0.0, 0usize), |(sum, n), f| (sum + f.motion_delta, n + 1));

    if moving == 0 {
        return Vec::new();
    }

    let mean = sum / moving as f64;
    let threshold = mean * config.scene_threshold_multiplier;
    if threshold <= 0.0 {
        return Vec::new();
    }

    let scenes: Vec<SceneChangeEvent> = frames
        .iter()
        .filter(|f| f.motion_delta > threshold)
        .map(|f| SceneChangeEvent {
            time: f.time,
            confidence: (f.motion_delta / (2.0 * threshold)).min(1.0),
        })
        .collect();

    debug!(
        mean_motion = format!("{:.4}", mean),
        threshold = format!("{:.4}", threshold),
        scenes = scenes.len(),
        "Scene detection complete"
    );

    scenes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(motion: &[f64]) -> Vec<FrameSample> {
        motion
            .iter()
            .enumerate()
            .map(|(i, &m)| FrameSample {
                time: i as f64 * 0.5,
                brightness: 0.5,
                contrast: 0.2,
                motion_delta: m,
                thumbnail: None,
            })
            .collect()
    }

    #[test]
    fn test_static_footage_has_no_scenes() {
        let config = DetectorConfig::default();
        assert!(detect_scenes(&frames(&[0.0; 20]), &config).is_empty());
        assert!(detect_scenes(&[], &config).is_empty());
    }

    #[test]
    fn test_single_spike() {
        let mut motion = vec![0.01; 20];
        motion[0] = 0.0;
        motion[10] = 0.5;

        let scenes = detect_scenes(&frames(&motion), &DetectorConfig::default());

        assert_eq!(scenes.len(), 1);
        assert!((scenes[0].time - 5.0).abs() < 1e-9);
        assert!(scenes[0].confidence > 0.0 && scenes[0].confidence <= 1.0);
    }

    #[test]
    fn test_confidence_scales_with_spike() {
        // mean = (8 * 0.1 + 0.6) / 9, threshold = 2.5 * mean
        let mut motion = vec![0.1; 9];
        motion[4] = 0.6;
        let scenes = detect_scenes(&frames(&motion), &DetectorConfig::default());

        let mean = (8.0 * 0.1 + 0.6) / 9.0;
        let expected = 0.6 / (2.0 * 2.5 * mean);
        assert_eq!(scenes.len(), 1);
        assert!((scenes[0].confidence - expected).abs() < 1e-9);
        assert!(scenes[0].confidence < 1.0);
    }

    #[test]
    fn test_uniform_motion_has_no_scenes() {
        let scenes = detect_scenes(&frames(&[0.3; 12]), &DetectorConfig::default());
        assert!(scenes.is_empty());
    }
}
