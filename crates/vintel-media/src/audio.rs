//! Audio segmenter.
//!
//! Decodes the source's audio track to mono PCM and reduces it to:
//! 1. RMS energy per fixed bucket (aligned with the frame cadence)
//! 2. A fixed-length waveform of block-averaged magnitudes
//!
//! If fetching or decoding fails for any reason, the run continues on
//! synthetic random data of the right shape. The result is tagged
//! [`AudioProvenance::Synthetic`] so callers can tell it apart.

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use vintel_models::{AudioProvenance, AudioSegment};

use crate::cancel::CancelSignal;
use crate::config::AudioConfig;
use crate::error::{MediaError, MediaResult};
use crate::metrics;
use crate::progress::{AnalysisStage, ProgressReporter};
use crate::source::{AudioDecoder, MediaSource, PcmAudio};

/// Synthetic bucket energies are drawn from this range.
const SYNTHETIC_ENERGY: std::ops::Range<f64> = 0.02..0.32;

/// Synthetic waveform points are drawn from this range.
const SYNTHETIC_WAVEFORM: std::ops::Range<f64> = 0.0..0.5;

/// Output of the audio stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAnalysis {
    pub segments: Vec<AudioSegment>,
    pub waveform: Vec<f64>,
    pub provenance: AudioProvenance,
}

/// RMS energy per bucket. Trailing samples that don't fill a bucket are
/// ignored.
pub fn segment_energies(pcm: &PcmAudio, config: &AudioConfig) -> Vec<AudioSegment> {
    let per_bucket = ((pcm.sample_rate as f64 * config.segment_interval).round() as usize).max(1);
    let buckets = pcm.samples.len() / per_bucket;
    let interval = config.segment_interval;
    let threshold = config.silence_threshold;

    pcm.samples[..buckets * per_bucket]
        .par_chunks_exact(per_bucket)
        .enumerate()
        .map(|(i, chunk)| {
            let sum_squares: f64 = chunk.iter().map(|&s| (s as f64).powi(2)).sum();
            let rms = (sum_squares / chunk.len() as f64).sqrt();
            AudioSegment::new(i as f64 * interval, rms, threshold)
        })
        .collect()
}

/// Mean absolute amplitude over `points` equal blocks of the track.
pub fn waveform(samples: &[f32], points: usize) -> Vec<f64> {
    if points == 0 {
        return Vec::new();
    }
    let block = (samples.len() / points).max(1);

    (0..points)
        .map(|i| {
            let start = i * block;
            if start >= samples.len() {
                return 0.0;
            }
            let end = (start + block).min(samples.len());
            let slice = &samples[start..end];
            slice.iter().map(|s| s.abs() as f64).sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Random placeholder audio covering `duration`.
pub fn synthesize<R: Rng>(duration: f64, config: &AudioConfig, rng: &mut R) -> AudioAnalysis {
    let count = if duration.is_finite() && duration > 0.0 {
        (duration / config.segment_interval + 1e-9).floor() as usize
    } else {
        0
    };

    let segments = (0..count)
        .map(|i| {
            let energy = rng.random_range(SYNTHETIC_ENERGY);
            AudioSegment::new(i as f64 * config.segment_interval, energy, config.silence_threshold)
        })
        .collect();

    let waveform = (0..config.waveform_points)
        .map(|_| rng.random_range(SYNTHETIC_WAVEFORM))
        .collect();

    AudioAnalysis {
        segments,
        waveform,
        provenance: AudioProvenance::Synthetic,
    }
}

/// Runs the audio stage against a source and decoder.
pub struct AudioSegmenter {
    config: AudioConfig,
}

impl AudioSegmenter {
    pub fn new(config: AudioConfig) -> Self {
        Self { config }
    }

    /// Decode and bucket the source's audio, falling back to synthetic data
    /// on any decode failure.
    pub async fn analyze<S, D>(
        &self,
        source: &S,
        decoder: &D,
        duration: f64,
        cancel: &CancelSignal,
        progress: &mut ProgressReporter,
    ) -> MediaResult<AudioAnalysis>
    where
        S: MediaSource + ?Sized,
        D: AudioDecoder + ?Sized,
    {
        cancel.check()?;
        progress.report(AnalysisStage::AnalyzingAudio, 55.0);

        let decoded = self.decode(source, decoder).await;
        cancel.check()?;

        let analysis = match decoded {
            Ok(pcm) => {
                debug!(
                    samples = pcm.samples.len(),
                    sample_rate = pcm.sample_rate,
                    decoded_secs = format!("{:.2}", pcm.duration()),
                    "Decoded audio track"
                );
                AudioAnalysis {
                    segments: segment_energies(&pcm, &self.config),
                    waveform: waveform(&pcm.samples, self.config.waveform_points),
                    provenance: AudioProvenance::Decoded,
                }
            }
            Err(e) => {
                warn!(
                    source = source.id(),
                    error = %e,
                    "Audio decode failed, continuing with synthetic audio"
                );
                metrics::record_audio_fallback();
                synthesize(duration, &self.config, &mut rand::rng())
            }
        };

        progress.report(AnalysisStage::AnalyzingAudio, 70.0);
        info!(
            segments = analysis.segments.len(),
            silent = analysis.segments.iter().filter(|s| s.is_silent).count(),
            provenance = analysis.provenance.as_str(),
            "Audio analysis complete"
        );

        Ok(analysis)
    }

    async fn decode<S, D>(&self, source: &S, decoder: &D) -> MediaResult<PcmAudio>
    where
        S: MediaSource + ?Sized,
        D: AudioDecoder + ?Sized,
    {
        let bytes = source.fetch_bytes().await?;
        let pcm = decoder.decode(bytes, self.config.sample_rate).await?;
        if pcm.is_empty() || pcm.sample_rate == 0 {
            return Err(MediaError::audio_decode("decoder returned no samples"));
        }
        Ok(pcm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tone(secs: f64, sample_rate: u32, amplitude: f32) -> PcmAudio {
        let n = (secs * sample_rate as f64) as usize;
        PcmAudio {
            samples: (0..n)
                .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
                .collect(),
            sample_rate,
        }
    }

    #[test]
    fn test_segment_energies_rms() {
        let config = AudioConfig::default();
        let pcm = tone(2.0, 1000, 0.5);
        let segments = segment_energies(&pcm, &config);

        assert_eq!(segments.len(), 4);
        for (i, seg) in segments.iter().enumerate() {
            assert!((seg.time - i as f64 * 0.5).abs() < 1e-9);
            assert!((seg.energy - 0.5).abs() < 1e-6);
            assert!(!seg.is_silent);
        }
    }

    #[test]
    fn test_partial_bucket_is_dropped() {
        let config = AudioConfig::default();
        let pcm = tone(1.2, 1000, 0.001);
        let segments = segment_energies(&pcm, &config);

        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.is_silent));
    }

    #[test]
    fn test_waveform_length_is_fixed() {
        let samples: Vec<f32> = (0..5000).map(|i| if i < 2500 { 0.2 } else { -0.6 }).collect();
        let wave = waveform(&samples, 1000);

        assert_eq!(wave.len(), 1000);
        assert!((wave[0] - 0.2).abs() < 1e-6);
        assert!((wave[999] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_waveform_short_track_pads_with_zero() {
        let wave = waveform(&[0.5, -0.5, 0.25], 10);
        assert_eq!(wave.len(), 10);
        assert!((wave[1] - 0.5).abs() < 1e-6);
        assert_eq!(wave[9], 0.0);
    }

    #[test]
    fn test_synthesize_shape() {
        let config = AudioConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let analysis = synthesize(10.0, &config, &mut rng);

        assert_eq!(analysis.segments.len(), 20);
        assert_eq!(analysis.waveform.len(), 1000);
        assert_eq!(analysis.provenance, AudioProvenance::Synthetic);
        assert!(analysis
            .segments
            .iter()
            .all(|s| s.energy >= 0.02 && s.energy < 0.32 && !s.is_silent));
        assert!((analysis.segments[19].time - 9.5).abs() < 1e-9);
    }
}
