//! FFmpeg-backed media source and audio decoder for local files.
//!
//! Every frame is a separate `ffmpeg -ss t ... -frames:v 1` invocation that
//! writes raw RGB24 to stdout. Slow for long sources, but stateless and
//! exact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::cancel::CancelSignal;
use crate::command::{FfmpegCommand, FfmpegRunner, PIPE_OUT};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_media, MediaInfo};
use crate::source::{AudioDecoder, MediaSource, PcmAudio, RgbFrame};

/// A local media file read through FFmpeg.
pub struct FfmpegSource {
    path: PathBuf,
    id: String,
    info: MediaInfo,
    position: f64,
    runner: FfmpegRunner,
}

impl FfmpegSource {
    /// Probe `path` and open it as a source.
    pub async fn open(path: impl AsRef<Path>, timeout_secs: u64, cancel: CancelSignal) -> MediaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let info = probe_media(&path, timeout_secs).await?;

        debug!(
            path = %path.display(),
            duration = ?info.duration,
            width = info.width,
            height = info.height,
            has_audio = info.has_audio,
            "Opened media source"
        );

        Ok(Self {
            id: path.to_string_lossy().to_string(),
            path,
            info,
            position: 0.0,
            runner: FfmpegRunner::new()
                .with_timeout(timeout_secs)
                .with_cancel(cancel),
        })
    }

    /// Probed stream information.
    pub fn info(&self) -> &MediaInfo {
        &self.info
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MediaSource for FfmpegSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn duration(&self) -> Option<f64> {
        self.info.duration
    }

    async fn seek(&mut self, time: f64) -> MediaResult<()> {
        self.position = time.max(0.0);
        Ok(())
    }

    async fn render_frame(&mut self, width: u32, height: u32) -> MediaResult<RgbFrame> {
        let cmd = FfmpegCommand::new(&self.path, PIPE_OUT)
            .seek(self.position)
            .single_frame()
            .video_filter(format!("scale={}:{}", width, height))
            .raw_rgb24();

        let mut data = self.runner.capture(&cmd).await?;

        let expected = width as usize * height as usize * 3;
        if data.len() < expected {
            return Err(MediaError::frame_read(
                self.position,
                format!("ffmpeg returned {} bytes, expected {}", data.len(), expected),
            ));
        }
        data.truncate(expected);

        RgbFrame::new(width, height, data)
    }

    async fn fetch_bytes(&self) -> MediaResult<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Decodes any FFmpeg-readable container to mono f32 PCM.
///
/// The bytes are spooled to a temporary file first: MP4/MOV files with the
/// `moov` atom at the end cannot be demuxed from a pipe.
#[derive(Debug, Clone, Default)]
pub struct FfmpegAudioDecoder {
    runner: FfmpegRunner,
}

impl FfmpegAudioDecoder {
    pub fn new(timeout_secs: u64, cancel: CancelSignal) -> Self {
        Self {
            runner: FfmpegRunner::new()
                .with_timeout(timeout_secs)
                .with_cancel(cancel),
        }
    }
}

#[async_trait]
impl AudioDecoder for FfmpegAudioDecoder {
    async fn decode(&self, bytes: Vec<u8>, sample_rate: u32) -> MediaResult<PcmAudio> {
        let spool = spool_to_tempfile(&bytes)
            .await
            .map_err(|e| MediaError::audio_decode(format!("spool media bytes: {e}")))?;
        drop(bytes);

        let cmd = FfmpegCommand::new(spool.path(), PIPE_OUT).mono_f32le(sample_rate);
        let raw = self
            .runner
            .capture(&cmd)
            .await
            .map_err(|e| MediaError::audio_decode(e.to_string()))?;

        Ok(PcmAudio {
            samples: f32le_samples(&raw),
            sample_rate,
        })
    }
}

/// Write `bytes` to a temporary file removed when the handle drops.
async fn spool_to_tempfile(bytes: &[u8]) -> MediaResult<NamedTempFile> {
    let file = tempfile::Builder::new().prefix("vintel-audio-").tempfile()?;
    tokio::fs::write(file.path(), bytes).await?;
    Ok(file)
}

/// Little-endian f32 samples; a trailing partial sample is dropped.
fn f32le_samples(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32le_samples() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&0.5f32.to_le_bytes());
        raw.extend_from_slice(&(-1.0f32).to_le_bytes());
        raw.push(0xff);

        assert_eq!(f32le_samples(&raw), vec![0.5, -1.0]);
    }

    #[tokio::test]
    async fn test_spooled_bytes_are_seekable_on_disk() {
        let spool = spool_to_tempfile(b"ftyp....mdat....moov").await.unwrap();
        let path = spool.path().to_path_buf();

        assert_eq!(std::fs::read(&path).unwrap(), b"ftyp....mdat....moov");
        let args = FfmpegCommand::new(&path, PIPE_OUT).mono_f32le(22_050).build_args();
        assert!(args.contains(&path.to_string_lossy().to_string()));
        assert!(!args.iter().any(|a| a == "pipe:0"));

        drop(spool);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = FfmpegSource::open("/nonexistent/clip.mp4", 5, CancelSignal::none()).await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
