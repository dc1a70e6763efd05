//! Virality scorer.
//!
//! Slides windows of each configured length across the timeline and scores
//! each one from the sampled signals.
//!
//! # Score components
//! | Component | Formula                          | Cap |
//! |-----------|----------------------------------|-----|
//! | energy    | mean bucket energy x 100         | 30  |
//! | motion    | mean frame motion x 5            | 25  |
//! | scene     | scene changes x 5                | 15  |
//! | beat      | beats x 3                        | 15  |
//! | silence   | 15 - silent fraction x 30 (>= 0) | 15  |
//!
//! The caps sum to 100, so the rounded total is always in `[0, 100]`.

use std::cmp::Ordering;

use tracing::debug;
use vintel_models::timestamp::format_clock;
use vintel_models::{
    clip_id, AudioSegment, BeatMarker, FrameSample, SceneChangeEvent, SilentRegion, Thumbnail,
    ViralClipCandidate,
};

use crate::config::ScoringConfig;

/// Tolerance when fitting windows against the total duration.
const WINDOW_EPSILON: f64 = 1e-9;

/// Borrowed view of everything the scorer reads.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub frames: &'a [FrameSample],
    pub audio: &'a [AudioSegment],
    pub scenes: &'a [SceneChangeEvent],
    pub beats: &'a [BeatMarker],
    pub silent_regions: &'a [SilentRegion],
    pub duration: f64,
}

/// Sub-scores for one window, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowScore {
    pub energy: f64,
    pub motion: f64,
    pub scene: f64,
    pub beat: f64,
    pub silence: f64,
    pub scene_count: usize,
    pub beat_count: usize,
    pub silence_fraction: f64,
}

impl WindowScore {
    /// Rounded composite score in `[0, 100]`.
    pub fn total(&self) -> u32 {
        let sum = self.energy + self.motion + self.scene + self.beat + self.silence;
        sum.round().clamp(0.0, 100.0) as u32
    }
}

/// Tier name shown in front of a candidate's start time.
fn tier_label(score: u32) -> &'static str {
    match score {
        75.. => "Viral moment",
        55..=74 => "Strong clip",
        _ => "Solid clip",
    }
}

fn in_window(time: f64, start: f64, end: f64) -> bool {
    time >= start && time < end
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Ranks time windows by shareability.
pub struct ViralityScorer {
    config: ScoringConfig,
}

impl ViralityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score the window `[start, start + length)`.
    pub fn score_window(&self, input: &ScoringInput<'_>, start: f64, length: f64) -> WindowScore {
        let c = &self.config;
        let end = start + length;

        let mean_energy = mean(
            input
                .audio
                .iter()
                .filter(|s| in_window(s.time, start, end))
                .map(|s| s.energy),
        );
        let mean_motion = mean(
            input
                .frames
                .iter()
                .filter(|f| in_window(f.time, start, end))
                .map(|f| f.motion_delta),
        );
        let scene_count = input
            .scenes
            .iter()
            .filter(|s| in_window(s.time, start, end))
            .count();
        let beat_count = input
            .beats
            .iter()
            .filter(|b| in_window(b.time, start, end))
            .count();
        let silent_secs: f64 = input
            .silent_regions
            .iter()
            .map(|r| r.overlap_with(start, end))
            .sum();
        let silence_fraction = if length > 0.0 {
            silent_secs / length
        } else {
            0.0
        };

        WindowScore {
            energy: (mean_energy * c.energy_weight).min(c.energy_cap),
            motion: (mean_motion * c.motion_weight).min(c.motion_cap),
            scene: (scene_count as f64 * c.scene_weight).min(c.scene_cap),
            beat: (beat_count as f64 * c.beat_weight).min(c.beat_cap),
            silence: (c.silence_cap - silence_fraction * c.silence_weight).max(0.0),
            scene_count,
            beat_count,
            silence_fraction,
        }
    }

    /// Human-readable reasons, in a fixed order.
    pub fn reasons(&self, score: &WindowScore) -> Vec<String> {
        let c = &self.config;
        let checks = [
            (score.energy > c.reason_energy_score, "High audio energy"),
            (score.motion > c.reason_motion_score, "Dynamic visuals"),
            (score.scene_count > c.reason_scene_count, "Multiple scene changes"),
            (score.beat_count > c.reason_beat_count, "Strong rhythm"),
            (score.silence_fraction < c.reason_silence_fraction, "Continuous audio"),
        ];

        checks
            .iter()
            .filter(|(hit, _)| *hit)
            .map(|(_, reason)| reason.to_string())
            .collect()
    }

    /// Every window that clears the minimum score, unranked.
    pub fn candidates(&self, input: &ScoringInput<'_>) -> Vec<ViralClipCandidate> {
        let mut out = Vec::new();

        for &length in &self.config.clip_lengths {
            if !(length > 0.0) || length > input.duration + WINDOW_EPSILON {
                continue;
            }
            let step = (length / self.config.window_step_divisor).max(self.config.min_window_step);
            if !(step.is_finite() && step > 0.0) {
                continue;
            }

            let mut index = 0usize;
            loop {
                let start = index as f64 * step;
                if start + length > input.duration + WINDOW_EPSILON {
                    break;
                }
                index += 1;

                let score = self.score_window(input, start, length);
                let total = score.total();
                if (total as f64) <= self.config.min_score {
                    continue;
                }

                out.push(ViralClipCandidate {
                    id: clip_id(start, length),
                    start_time: start,
                    end_time: start + length,
                    duration: length,
                    virality_score: total,
                    label: format!("{} at {}", tier_label(total), format_clock(start)),
                    reasons: self.reasons(&score),
                    thumbnail: thumbnail_at(input.frames, start),
                });
            }
        }

        out
    }

    /// Rank, de-overlap and truncate candidates.
    pub fn score(&self, input: &ScoringInput<'_>) -> Vec<ViralClipCandidate> {
        let mut candidates = self.candidates(input);
        let scored = candidates.len();

        candidates.sort_by(rank_order);

        let mut kept: Vec<ViralClipCandidate> = Vec::new();
        for candidate in candidates {
            if kept.len() >= self.config.max_candidates {
                break;
            }
            let clashes = kept.iter().any(|k| {
                let shorter = k.duration.min(candidate.duration);
                candidate.overlap_with(k) > self.config.max_overlap_ratio * shorter + WINDOW_EPSILON
            });
            if !clashes {
                kept.push(candidate);
            }
        }

        debug!(
            windows_above_threshold = scored,
            kept = kept.len(),
            top_score = kept.first().map(|c| c.virality_score).unwrap_or(0),
            "Virality scoring complete"
        );

        kept
    }
}

/// Score descending, then earlier start, then shorter length.
pub(crate) fn rank_order(a: &ViralClipCandidate, b: &ViralClipCandidate) -> Ordering {
    b.virality_score
        .cmp(&a.virality_score)
        .then_with(|| a.start_time.total_cmp(&b.start_time))
        .then_with(|| a.duration.total_cmp(&b.duration))
}

/// Thumbnail of the last thumbnail-carrying frame at or before `time`.
fn thumbnail_at(frames: &[FrameSample], time: f64) -> Option<Thumbnail> {
    frames
        .iter()
        .rev()
        .filter(|f| f.time <= time + WINDOW_EPSILON)
        .find_map(|f| f.thumbnail.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        frames: Vec<FrameSample>,
        audio: Vec<AudioSegment>,
        scenes: Vec<SceneChangeEvent>,
        beats: Vec<BeatMarker>,
        silent_regions: Vec<SilentRegion>,
        duration: f64,
    }

    impl Fixture {
        /// Uniform footage: constant motion and energy, a beat every second.
        fn lively(duration: f64) -> Self {
            let steps = (duration / 0.5) as usize;
            let frames = (0..steps)
                .map(|i| FrameSample {
                    time: i as f64 * 0.5,
                    brightness: 0.5,
                    contrast: 0.3,
                    motion_delta: 0.4,
                    thumbnail: (i % 5 == 0).then(|| Thumbnail {
                        width: 160,
                        height: 90,
                        data_url: format!("data:image/jpeg;base64,{i}"),
                    }),
                })
                .collect();
            let audio = (0..steps)
                .map(|i| AudioSegment::new(i as f64 * 0.5, 0.4, 0.01))
                .collect();
            let beats = (1..duration as usize)
                .map(|s| BeatMarker {
                    time: s as f64,
                    strength: 0.1,
                })
                .collect();

            Self {
                frames,
                audio,
                scenes: Vec::new(),
                beats,
                silent_regions: Vec::new(),
                duration,
            }
        }

        fn silent(duration: f64) -> Self {
            let steps = (duration / 0.5) as usize;
            Self {
                frames: (0..steps)
                    .map(|i| FrameSample {
                        time: i as f64 * 0.5,
                        brightness: 0.0,
                        contrast: 0.0,
                        motion_delta: 0.0,
                        thumbnail: None,
                    })
                    .collect(),
                audio: (0..steps)
                    .map(|i| AudioSegment::new(i as f64 * 0.5, 0.0, 0.01))
                    .collect(),
                scenes: Vec::new(),
                beats: Vec::new(),
                silent_regions: vec![SilentRegion {
                    start: 0.0,
                    end: duration,
                }],
                duration,
            }
        }

        fn input(&self) -> ScoringInput<'_> {
            ScoringInput {
                frames: &self.frames,
                audio: &self.audio,
                scenes: &self.scenes,
                beats: &self.beats,
                silent_regions: &self.silent_regions,
                duration: self.duration,
            }
        }
    }

    fn scorer() -> ViralityScorer {
        ViralityScorer::new(ScoringConfig::default())
    }

    #[test]
    fn test_lively_window_score() {
        let fixture = Fixture::lively(40.0);
        let score = scorer().score_window(&fixture.input(), 0.0, 15.0);

        assert!((score.energy - 30.0).abs() < 1e-9);
        assert!((score.motion - 2.0).abs() < 1e-6);
        assert_eq!(score.scene_count, 0);
        assert_eq!(score.beat_count, 14);
        assert!((score.beat - 15.0).abs() < 1e-9);
        assert!((score.silence - 15.0).abs() < 1e-9);
        assert_eq!(score.total(), 62);

        assert_eq!(
            scorer().reasons(&score),
            vec!["High audio energy", "Strong rhythm", "Continuous audio"]
        );
    }

    #[test]
    fn test_overlapping_windows_are_dropped() {
        let fixture = Fixture::lively(40.0);
        let clips = scorer().score(&fixture.input());

        let ids: Vec<&str> = clips.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["clip-0-15", "clip-8-15", "clip-15-15", "clip-23-15"]);

        for (i, a) in clips.iter().enumerate() {
            for b in &clips[i + 1..] {
                let shorter = a.duration.min(b.duration);
                assert!(a.overlap_with(b) <= 0.5 * shorter + 1e-9);
            }
        }
    }

    #[test]
    fn test_candidate_shape() {
        let fixture = Fixture::lively(40.0);
        for clip in scorer().score(&fixture.input()) {
            assert!(clip.virality_score <= 100);
            assert!(clip.virality_score > 35);
            assert_eq!(clip.end_time - clip.start_time, clip.duration);
            assert!(clip.label.starts_with("Strong clip at "));
        }
    }

    #[test]
    fn test_ids_are_stable_across_runs() {
        let fixture = Fixture::lively(90.0);
        let first = scorer().score(&fixture.input());
        let second = scorer().score(&fixture.input());

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_silent_video_has_no_candidates() {
        let fixture = Fixture::silent(20.0);
        let score = scorer().score_window(&fixture.input(), 0.0, 15.0);
        assert_eq!(score.total(), 0);
        assert!(scorer().score(&fixture.input()).is_empty());

        // Shorter than every clip length
        assert!(scorer().score(&Fixture::silent(10.0).input()).is_empty());
    }

    #[test]
    fn test_partial_silence_lowers_score() {
        let mut fixture = Fixture::lively(20.0);
        fixture.silent_regions = vec![SilentRegion { start: 0.0, end: 7.5 }];

        let score = scorer().score_window(&fixture.input(), 0.0, 15.0);
        assert!((score.silence_fraction - 0.5).abs() < 1e-9);
        assert_eq!(score.silence, 0.0);
        assert!(scorer().reasons(&score).iter().all(|r| r != "Continuous audio"));
    }

    #[test]
    fn test_max_candidates() {
        let config = ScoringConfig {
            max_candidates: 2,
            ..Default::default()
        };
        let fixture = Fixture::lively(120.0);
        assert_eq!(ViralityScorer::new(config).score(&fixture.input()).len(), 2);
    }

    #[test]
    fn test_thumbnail_is_nearest_before_start() {
        let fixture = Fixture::lively(40.0);
        let clips = scorer().score(&fixture.input());

        let at = |id: &str| clips.iter().find(|c| c.id == id).unwrap();
        // Thumbnails every 2.5s; window at 7.5 uses its own frame.
        assert_eq!(at("clip-8-15").thumbnail.as_ref().unwrap().data_url, "data:image/jpeg;base64,15");
        assert_eq!(at("clip-23-15").thumbnail.as_ref().unwrap().data_url, "data:image/jpeg;base64,45");
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(tier_label(80), "Viral moment");
        assert_eq!(tier_label(75), "Viral moment");
        assert_eq!(tier_label(60), "Strong clip");
        assert_eq!(tier_label(40), "Solid clip");
    }
}
