//! Pipeline error types.
//!
//! Download failures and the empty-segments outcome surface verbatim so
//! callers can map them to user-visible responses; every other failure is the
//! single "failed to trim video" category, still carrying its typed inner
//! cause for callers that introspect.

use thiserror::Error;

use rallycut_media::{DownloadError, MediaError};
use rallycut_models::{ConfigError, TimeRange};
use rallycut_storage::StorageError;

/// Result type for pipeline runs.
pub type RunResult<T> = Result<T, PipelineError>;

/// Errors that can end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("no motion segments detected")]
    NoSegments {
        /// Always empty; kept so callers can echo the detector output.
        segments: Vec<TimeRange>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to trim video: {0}")]
    Media(#[from] MediaError),

    #[error("failed to trim video: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_passes_through_verbatim() {
        let err = PipelineError::from(DownloadError::MissingSource);
        assert_eq!(err.to_string(), "No video provided");
        match err {
            PipelineError::Download(inner) => assert_eq!(inner.status_code(), 400),
            other => panic!("unexpected variant: {other}"),
        }
    }

    #[test]
    fn test_other_errors_become_trim_failures() {
        let err = PipelineError::from(MediaError::NoSegmentsToTrim);
        assert!(err.to_string().starts_with("failed to trim video"));

        let err = PipelineError::from(StorageError::upload_failed("disk full"));
        assert!(err.to_string().starts_with("failed to trim video"));
    }
}
