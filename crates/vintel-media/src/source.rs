//! The media-source seam.
//!
//! The analyzer never touches files, players or decoders directly. It drives
//! a [`MediaSource`] for frames and hands the source's bytes to an
//! [`AudioDecoder`] for PCM. [`crate::ffmpeg_source`] provides FFmpeg-backed
//! implementations of both for local files.

use async_trait::async_trait;

use crate::error::{MediaError, MediaResult};

/// A decoded frame as packed RGB24 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes, row-major
    pub data: Vec<u8>,
}

impl RgbFrame {
    /// Wrap a pixel buffer, checking its length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> MediaResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(MediaError::internal(format!(
                "frame buffer is {} bytes, expected {} for {}x{} RGB",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with one colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Mono PCM samples in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmAudio {
    /// Track length in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A decodable, seekable media source.
///
/// Seeking moves the source's playback position. The sampler drives the
/// position exclusively for the duration of a run, which the `&mut self`
/// receivers enforce.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Stable identity of the underlying media (path, URL or handle name).
    fn id(&self) -> &str;

    /// Total duration in seconds, if known.
    fn duration(&self) -> Option<f64>;

    /// Seek to `time` and resolve once the frame there is ready to render.
    async fn seek(&mut self, time: f64) -> MediaResult<()>;

    /// Render the current frame scaled to `width` x `height`.
    async fn render_frame(&mut self, width: u32, height: u32) -> MediaResult<RgbFrame>;

    /// Fetch the raw bytes of the underlying media for audio decoding.
    async fn fetch_bytes(&self) -> MediaResult<Vec<u8>>;
}

/// Turns encoded media bytes into mono PCM.
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Decode `bytes` to mono samples at roughly `sample_rate` Hz.
    async fn decode(&self, bytes: Vec<u8>, sample_rate: u32) -> MediaResult<PcmAudio>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_length_is_checked() {
        assert!(RgbFrame::new(2, 2, vec![0; 12]).is_ok());
        assert!(RgbFrame::new(2, 2, vec![0; 11]).is_err());
    }

    #[test]
    fn test_solid_frame() {
        let frame = RgbFrame::solid(4, 3, [10, 20, 30]);
        assert_eq!(frame.pixel_count(), 12);
        assert_eq!(frame.data.len(), 36);
        assert_eq!(&frame.data[3..6], &[10, 20, 30]);
    }

    #[test]
    fn test_pcm_duration() {
        let pcm = PcmAudio {
            samples: vec![0.0; 22_050],
            sample_rate: 44_100,
        };
        assert!((pcm.duration() - 0.5).abs() < f64::EPSILON);

        let empty = PcmAudio {
            samples: Vec::new(),
            sample_rate: 0,
        };
        assert_eq!(empty.duration(), 0.0);
        assert!(empty.is_empty());
    }
}
