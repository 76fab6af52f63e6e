//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to configure storage: {0}")]
    ConfigError(String),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Signing failed: {0}")]
    SignFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Azure SDK error: {0}")]
    Azure(String),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn sign_failed(msg: impl Into<String>) -> Self {
        Self::SignFailed(msg.into())
    }
}

impl From<azure_core::error::Error> for StorageError {
    fn from(e: azure_core::error::Error) -> Self {
        Self::Azure(e.to_string())
    }
}
