//! Artifact storage for the RallyCut pipeline.
//!
//! One capability interface, two implementations:
//! - [`LocalStorage`] keeps artifacts under a local directory tree and hands
//!   out relative URLs.
//! - [`BlobStorage`] uploads to an Azure blob container and hands out
//!   short-lived signed read URLs.
//!
//! Construction picks the implementation from configuration: a connection
//! string selects blob mode.

pub mod azure;
pub mod config;
pub mod error;
pub mod local;
pub mod sas;

pub use azure::BlobStorage;
pub use config::{StorageConfig, DEFAULT_SAS_TTL};
pub use error::{StorageError, StorageResult};
pub use local::LocalStorage;
pub use sas::SasSigner;

use async_trait::async_trait;
use std::path::Path;

use rallycut_models::StoredVideo;

/// Persists input and output artifacts and returns dereferenceable URLs.
///
/// Implementations are safe for concurrent use: disk operations touch
/// distinct filenames, blob operations distinct blob names, and the blob
/// container bootstrap is idempotent.
#[async_trait]
pub trait VideoStorage: Send + Sync {
    /// Persist an input artifact and describe where it lives.
    async fn save_input(&self, path: &Path, name: &str) -> StorageResult<StoredVideo>;

    /// Persist an output artifact and describe where it lives.
    async fn save_output(&self, path: &Path, name: &str) -> StorageResult<StoredVideo>;

    /// List stored input artifacts.
    async fn list_inputs(&self) -> StorageResult<Vec<StoredVideo>>;

    /// List stored output artifacts.
    async fn list_outputs(&self) -> StorageResult<Vec<StoredVideo>>;

    /// Whether an output with this name exists.
    async fn output_exists(&self, name: &str) -> StorageResult<bool>;

    /// URL for an output, optionally forcing attachment disposition.
    async fn get_output_url(&self, name: &str, as_attachment: bool) -> StorageResult<String>;

    /// Local directory where inputs are staged before persistence.
    fn local_input_dir(&self) -> &Path;

    /// Local directory where outputs are written before persistence.
    fn local_output_dir(&self) -> &Path;
}

/// Construct the storage sink selected by `config`.
pub async fn connect(config: &StorageConfig) -> StorageResult<Box<dyn VideoStorage>> {
    if config.connection_string.is_some() {
        Ok(Box::new(BlobStorage::new(config).await?))
    } else {
        Ok(Box::new(LocalStorage::new(config).await?))
    }
}

/// Construct the storage sink from environment configuration.
pub async fn storage_from_env() -> StorageResult<Box<dyn VideoStorage>> {
    connect(&StorageConfig::from_env()).await
}

/// Guess a video content type from the file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        _ => "video/mp4",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.webm"), "video/webm");
        assert_eq!(content_type_for("a.MOV"), "video/quicktime");
        assert_eq!(content_type_for("a.avi"), "video/x-msvideo");
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a.mkv"), "video/mp4");
        assert_eq!(content_type_for("noext"), "video/mp4");
    }

    #[tokio::test]
    async fn test_connect_selects_local_without_connection_string() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            uploads_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let storage = connect(&config).await.unwrap();
        assert!(storage.local_input_dir().ends_with("inputs"));
        assert!(storage.local_output_dir().ends_with("processed"));
    }
}
