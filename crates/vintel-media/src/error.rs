//! Error types for media analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during analysis.
///
/// Everything except [`MediaError::AudioDecode`] aborts an analysis run.
/// Audio decode failures are absorbed by the segmenter's synthetic fallback.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media source has no usable duration: {0}")]
    InvalidDuration(String),

    #[error("Seek to {time:.3}s did not complete within {timeout_ms}ms")]
    SeekTimeout { time: f64, timeout_ms: u64 },

    #[error("Failed to read frame at {time:.3}s: {message}")]
    FrameRead { time: f64, message: String },

    #[error("Audio decode failed: {0}")]
    AudioDecode(String),

    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("No analysis available for this session")]
    NotAnalyzed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an invalid duration error.
    pub fn invalid_duration(message: impl Into<String>) -> Self {
        Self::InvalidDuration(message.into())
    }

    /// Create a frame read error.
    pub fn frame_read(time: f64, message: impl Into<String>) -> Self {
        Self::FrameRead {
            time,
            message: message.into(),
        }
    }

    /// Create an audio decode error.
    pub fn audio_decode(message: impl Into<String>) -> Self {
        Self::AudioDecode(message.into())
    }

    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Invalid input and cancellation are final; plumbing failures may be
    /// transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SeekTimeout { .. } | Self::Timeout(_) | Self::Io(_) | Self::FfmpegFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MediaError::SeekTimeout {
            time: 2.5,
            timeout_ms: 1000,
        };
        assert_eq!(
            err.to_string(),
            "Seek to 2.500s did not complete within 1000ms"
        );

        let err = MediaError::invalid_duration("duration is NaN");
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_retryable() {
        assert!(!MediaError::invalid_duration("zero").is_retryable());
        assert!(!MediaError::Cancelled.is_retryable());
        assert!(MediaError::Timeout(30).is_retryable());
    }
}
