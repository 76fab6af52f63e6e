//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("probe failed: {message}")]
    Probe {
        message: String,
        stderr: Option<String>,
    },

    #[error("frame extraction failed: {message}")]
    Extraction {
        message: String,
        stderr: Option<String>,
    },

    #[error("trim mux failed: {message}")]
    Mux {
        message: String,
        stderr: Option<String>,
    },

    #[error("no segments to trim")]
    NoSegmentsToTrim,

    #[error("invalid video file: {0}")]
    InvalidVideo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Probe {
            message: message.into(),
            stderr,
        }
    }

    /// Create a frame extraction failure error.
    pub fn extraction_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            stderr,
        }
    }

    /// Create a trim mux failure error.
    pub fn mux_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Mux {
            message: message.into(),
            stderr,
        }
    }
}
