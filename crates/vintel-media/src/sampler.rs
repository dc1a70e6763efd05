//! Pixel sampler.
//!
//! Seeks the source at a fixed interval, renders each frame into a small
//! raster and reduces it to brightness, contrast and motion statistics.
//!
//! # Algorithm
//! 1. Seek to `i * interval` for `i in 0..floor(duration / interval)`,
//!    bounded by the seek timeout
//! 2. Render the frame at raster size (default 160x90)
//! 3. Brightness = mean Rec.601 luma; contrast = RMS luma deviation
//! 4. Motion = mean absolute per-channel difference vs. the previous frame,
//!    on every Nth pixel
//! 5. Every Nth frame, encode a JPEG thumbnail

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use tracing::{debug, info};
use vintel_models::{FrameSample, Thumbnail};

use crate::cancel::CancelSignal;
use crate::config::SamplerConfig;
use crate::error::{MediaError, MediaResult};
use crate::progress::{AnalysisStage, ProgressReporter};
use crate::source::{MediaSource, RgbFrame};

/// Share of overall progress covered by frame sampling.
const SAMPLING_PROGRESS_END: f64 = 50.0;

/// Timestamps at which frames are sampled: `floor(duration / interval)`
/// steps starting at 0.
pub fn sample_times(duration: f64, interval: f64) -> Vec<f64> {
    if !(duration.is_finite() && duration > 0.0 && interval > 0.0) {
        return Vec::new();
    }
    // Small epsilon so 10.0 / 0.5 doesn't land on 19.999...
    let count = (duration / interval + 1e-9).floor() as usize;
    (0..count).map(|i| i as f64 * interval).collect()
}

/// Brightness and contrast of a frame, both in `[0, 1]`.
pub fn luma_stats(frame: &RgbFrame) -> (f64, f64) {
    let pixels = frame.pixel_count();
    if pixels == 0 {
        return (0.0, 0.0);
    }

    let lumas: Vec<f64> = frame
        .data
        .chunks_exact(3)
        .map(|px| (0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64) / 255.0)
        .collect();

    let brightness = lumas.iter().sum::<f64>() / pixels as f64;
    let variance = lumas
        .iter()
        .map(|l| (l - brightness).powi(2))
        .sum::<f64>()
        / pixels as f64;

    // Deviation tops out at 0.5 for a half-black, half-white frame.
    let contrast = (variance.sqrt() * 2.0).min(1.0);

    (brightness.clamp(0.0, 1.0), contrast)
}

/// Mean absolute per-channel difference between two frames in `[0, 1]`,
/// comparing every `stride`-th pixel.
pub fn motion_delta(prev: &RgbFrame, current: &RgbFrame, stride: usize) -> f64 {
    if prev.data.len() != current.data.len() || current.data.is_empty() {
        return 0.0;
    }

    let stride = stride.max(1);
    let mut total = 0u64;
    let mut channels = 0u64;

    for (a, b) in prev
        .data
        .chunks_exact(3)
        .zip(current.data.chunks_exact(3))
        .step_by(stride)
    {
        for c in 0..3 {
            total += (a[c] as i32 - b[c] as i32).unsigned_abs() as u64;
        }
        channels += 3;
    }

    if channels == 0 {
        return 0.0;
    }
    (total as f64 / channels as f64 / 255.0).min(1.0)
}

/// Reject frames whose size or buffer length don't match the raster.
fn check_frame(frame: &RgbFrame, time: f64, width: u32, height: u32) -> MediaResult<()> {
    if frame.width != width || frame.height != height {
        return Err(MediaError::frame_read(
            time,
            format!(
                "source rendered {}x{}, expected {}x{}",
                frame.width, frame.height, width, height
            ),
        ));
    }
    let expected = frame.pixel_count() * 3;
    if frame.data.len() != expected {
        return Err(MediaError::frame_read(
            time,
            format!("frame buffer is {} bytes, expected {}", frame.data.len(), expected),
        ));
    }
    Ok(())
}

/// Encode a frame as a JPEG `data:` URL.
pub fn encode_thumbnail(frame: &RgbFrame, quality: u8) -> MediaResult<Thumbnail> {
    if frame.data.len() != frame.pixel_count() * 3 {
        return Err(MediaError::internal(format!(
            "thumbnail encode: {} bytes for a {}x{} frame",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(&frame.data, frame.width, frame.height, ColorType::Rgb8)
        .map_err(|e| MediaError::internal(format!("thumbnail encode: {e}")))?;

    Ok(Thumbnail {
        width: frame.width,
        height: frame.height,
        data_url: format!("data:image/jpeg;base64,{}", BASE64.encode(&buf)),
    })
}

/// Samples frames from a [`MediaSource`].
pub struct FrameSampler {
    config: SamplerConfig,
    prev_frame: Option<RgbFrame>,
}

impl FrameSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            prev_frame: None,
        }
    }

    /// Reduce one rendered frame to a sample, updating the motion baseline.
    pub fn ingest_frame(&mut self, index: usize, time: f64, frame: RgbFrame) -> MediaResult<FrameSample> {
        let (brightness, contrast) = luma_stats(&frame);
        let motion = match &self.prev_frame {
            Some(prev) => motion_delta(prev, &frame, self.config.motion_stride),
            None => 0.0,
        };

        let thumbnail = if self.config.thumbnail_every > 0 && index % self.config.thumbnail_every == 0 {
            Some(encode_thumbnail(&frame, self.config.thumbnail_quality)?)
        } else {
            None
        };

        self.prev_frame = Some(frame);

        Ok(FrameSample {
            time,
            brightness,
            contrast,
            motion_delta: motion,
            thumbnail,
        })
    }

    /// Sample the whole source.
    pub async fn sample<S>(
        &mut self,
        source: &mut S,
        duration: f64,
        cancel: &CancelSignal,
        progress: &mut ProgressReporter,
    ) -> MediaResult<Vec<FrameSample>>
    where
        S: MediaSource + ?Sized,
    {
        let times = sample_times(duration, self.config.frame_interval);
        let (width, height) = (self.config.raster_width, self.config.raster_height);
        let seek_timeout = self.config.seek_timeout();

        debug!(
            frames = times.len(),
            interval = self.config.frame_interval,
            width,
            height,
            "Sampling frames"
        );

        self.prev_frame = None;
        let mut samples = Vec::with_capacity(times.len());

        for (index, &time) in times.iter().enumerate() {
            cancel.check()?;

            tokio::time::timeout(seek_timeout, source.seek(time))
                .await
                .map_err(|_| MediaError::SeekTimeout {
                    time,
                    timeout_ms: self.config.seek_timeout_ms,
                })??;

            let frame = source
                .render_frame(width, height)
                .await
                .map_err(|e| match e {
                    MediaError::Cancelled | MediaError::Timeout(_) => e,
                    other => MediaError::frame_read(time, other.to_string()),
                })?;
            check_frame(&frame, time, width, height)?;

            samples.push(self.ingest_frame(index, time, frame)?);
            progress.report_fraction(
                AnalysisStage::SamplingFrames,
                0.0,
                SAMPLING_PROGRESS_END,
                index + 1,
                times.len(),
            );
        }

        self.prev_frame = None;

        info!(
            frames = samples.len(),
            thumbnails = samples.iter().filter(|s| s.thumbnail.is_some()).count(),
            "Frame sampling complete"
        );

        Ok(samples)
    }
}
