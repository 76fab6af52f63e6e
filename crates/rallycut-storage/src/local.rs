//! Local-disk storage sink.
//!
//! Artifacts live under `<base>/inputs` and `<base>/processed`; URLs are
//! relative paths that a static-file layer serves under `/uploads`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

use rallycut_models::StoredVideo;

use crate::config::StorageConfig;
use crate::error::StorageResult;
use crate::VideoStorage;

const INPUTS_DIR: &str = "inputs";
const OUTPUTS_DIR: &str = "processed";

/// Storage sink backed by a local directory tree.
pub struct LocalStorage {
    inputs_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl LocalStorage {
    /// Create the sink, making sure both directories exist.
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        let inputs_dir = config.uploads_dir.join(INPUTS_DIR);
        let outputs_dir = config.uploads_dir.join(OUTPUTS_DIR);
        tokio::fs::create_dir_all(&inputs_dir).await?;
        tokio::fs::create_dir_all(&outputs_dir).await?;
        Ok(Self {
            inputs_dir,
            outputs_dir,
        })
    }

    async fn save(
        &self,
        dir: &Path,
        url_prefix: &str,
        src: &Path,
        name: &str,
    ) -> StorageResult<StoredVideo> {
        let target = dir.join(name);
        if src != target {
            tokio::fs::copy(src, &target).await?;
            debug!(src = %src.display(), target = %target.display(), "Copied artifact");
        }
        stored_entry(&target, url_prefix, name).await
    }

    async fn list(&self, dir: &Path, url_prefix: &str) -> StorageResult<Vec<StoredVideo>> {
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = reader.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(stored_entry(&entry.path(), url_prefix, &name).await?);
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

async fn stored_entry(path: &Path, url_prefix: &str, name: &str) -> StorageResult<StoredVideo> {
    let metadata = tokio::fs::metadata(path).await?;
    let last_modified = metadata
        .modified()
        .ok()
        .map(DateTime::<Utc>::from);
    Ok(StoredVideo {
        name: name.to_string(),
        url: format!("{url_prefix}/{name}"),
        download_url: None,
        size: Some(metadata.len()),
        last_modified,
    })
}

#[async_trait]
impl VideoStorage for LocalStorage {
    async fn save_input(&self, path: &Path, name: &str) -> StorageResult<StoredVideo> {
        self.save(&self.inputs_dir, "/uploads/inputs", path, name)
            .await
    }

    async fn save_output(&self, path: &Path, name: &str) -> StorageResult<StoredVideo> {
        self.save(&self.outputs_dir, "/uploads/processed", path, name)
            .await
    }

    async fn list_inputs(&self) -> StorageResult<Vec<StoredVideo>> {
        self.list(&self.inputs_dir, "/uploads/inputs").await
    }

    async fn list_outputs(&self) -> StorageResult<Vec<StoredVideo>> {
        self.list(&self.outputs_dir, "/uploads/processed").await
    }

    async fn output_exists(&self, name: &str) -> StorageResult<bool> {
        Ok(tokio::fs::metadata(self.outputs_dir.join(name)).await.is_ok())
    }

    async fn get_output_url(&self, name: &str, _as_attachment: bool) -> StorageResult<String> {
        // Disposition is the static-file layer's concern in local mode.
        Ok(format!("/uploads/processed/{name}"))
    }

    fn local_input_dir(&self) -> &Path {
        &self.inputs_dir
    }

    fn local_output_dir(&self) -> &Path {
        &self.outputs_dir
    }
}
