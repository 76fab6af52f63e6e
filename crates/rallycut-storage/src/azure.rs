//! Azure blob storage sink.
//!
//! Blobs live at `<container>/<prefix>/<name>`. The container is created on
//! first use; every data-plane operation awaits that one-shot initialization,
//! so concurrent pipelines cannot race it. Returned URLs are short-lived read
//! SAS, with an attachment-disposition variant for downloads.

use async_trait::async_trait;
use azure_storage::StorageCredentials;
use azure_storage_blobs::prelude::{BlobServiceClient, ContainerClient};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use rallycut_models::StoredVideo;

use crate::config::{parse_connection_string, StorageConfig};
use crate::content_type_for;
use crate::error::{StorageError, StorageResult};
use crate::sas::{attachment_disposition, SasSigner};
use crate::VideoStorage;

/// Storage sink backed by an Azure blob container.
pub struct BlobStorage {
    container: ContainerClient,
    container_name: String,
    signer: SasSigner,
    input_prefix: String,
    output_prefix: String,
    sas_ttl: Duration,
    inputs_dir: PathBuf,
    outputs_dir: PathBuf,
    ready: OnceCell<()>,
}

impl BlobStorage {
    /// Create the sink from a config carrying a connection string.
    ///
    /// Local staging directories are created eagerly; the container itself is
    /// created lazily on the first blob operation.
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        let conn = config.connection_string.as_deref().ok_or_else(|| {
            StorageError::config_error("blob storage requires a connection string")
        })?;
        let creds = parse_connection_string(conn)?;

        let credentials = StorageCredentials::access_key(creds.account.clone(), creds.key.clone());
        let service = BlobServiceClient::new(creds.account.clone(), credentials);
        let container = service.container_client(&config.container);

        let inputs_dir = config.uploads_dir.join("inputs");
        let outputs_dir = config.uploads_dir.join("processed");
        tokio::fs::create_dir_all(&inputs_dir).await?;
        tokio::fs::create_dir_all(&outputs_dir).await?;

        Ok(Self {
            container,
            container_name: config.container.clone(),
            signer: SasSigner::new(creds.account, creds.key),
            input_prefix: config.input_folder.clone(),
            output_prefix: config.output_folder.clone(),
            sas_ttl: config.sas_ttl,
            inputs_dir,
            outputs_dir,
            ready: OnceCell::new(),
        })
    }

    /// One-shot create-if-absent, awaited by every operation.
    async fn container_ready(&self) -> StorageResult<()> {
        self.ready
            .get_or_try_init(|| async {
                match self.container.create().await {
                    Ok(_) => {
                        info!(container = %self.container_name, "Created blob container");
                        Ok(())
                    }
                    Err(e) if is_already_exists(&e) => Ok(()),
                    Err(e) => Err(StorageError::from(e)),
                }
            })
            .await
            .map(|_| ())
    }

    fn blob_name(&self, prefix: &str, name: &str) -> String {
        format!("{prefix}/{name}")
    }

    fn urls_for(&self, blob_name: &str, name: &str) -> StorageResult<(String, String)> {
        let url = self
            .signer
            .signed_blob_url(&self.container_name, blob_name, self.sas_ttl, None)?;
        let download_url = self.signer.signed_blob_url(
            &self.container_name,
            blob_name,
            self.sas_ttl,
            Some(&attachment_disposition(name)),
        )?;
        Ok((url, download_url))
    }

    async fn upload(&self, prefix: &str, path: &Path, name: &str) -> StorageResult<StoredVideo> {
        self.container_ready().await?;

        let blob_name = self.blob_name(prefix, name);
        let data = tokio::fs::read(path).await?;
        let size = data.len() as u64;

        debug!(blob = %blob_name, size, "Uploading blob");
        self.container
            .blob_client(&blob_name)
            .put_block_blob(data)
            .content_type(content_type_for(name))
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        let (url, download_url) = self.urls_for(&blob_name, name)?;
        Ok(StoredVideo {
            name: name.to_string(),
            url,
            download_url: Some(download_url),
            size: Some(size),
            last_modified: Some(Utc::now()),
        })
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredVideo>> {
        self.container_ready().await?;

        let full_prefix = format!("{prefix}/");
        let mut stream = self
            .container
            .list_blobs()
            .prefix(full_prefix.clone())
            .into_stream();

        let mut entries = Vec::new();
        while let Some(page) = stream.next().await {
            let page = page.map_err(|e| StorageError::ListFailed(e.to_string()))?;
            for blob in page.blobs.blobs() {
                let name = blob
                    .name
                    .strip_prefix(&full_prefix)
                    .unwrap_or(&blob.name)
                    .to_string();
                if name.is_empty() {
                    continue;
                }
                let (url, download_url) = self.urls_for(&blob.name, &name)?;
                entries.push(StoredVideo {
                    name,
                    url,
                    download_url: Some(download_url),
                    size: Some(blob.properties.content_length),
                    last_modified: DateTime::<Utc>::from_timestamp(
                        blob.properties.last_modified.unix_timestamp(),
                        0,
                    ),
                });
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

fn is_already_exists(e: &azure_core::error::Error) -> bool {
    e.as_http_error()
        .map(|http| http.status() == azure_core::StatusCode::Conflict)
        .unwrap_or(false)
}

#[async_trait]
impl VideoStorage for BlobStorage {
    async fn save_input(&self, path: &Path, name: &str) -> StorageResult<StoredVideo> {
        self.upload(&self.input_prefix, path, name).await
    }

    async fn save_output(&self, path: &Path, name: &str) -> StorageResult<StoredVideo> {
        self.upload(&self.output_prefix, path, name).await
    }

    async fn list_inputs(&self) -> StorageResult<Vec<StoredVideo>> {
        self.list(&self.input_prefix).await
    }

    async fn list_outputs(&self) -> StorageResult<Vec<StoredVideo>> {
        self.list(&self.output_prefix).await
    }

    async fn output_exists(&self, name: &str) -> StorageResult<bool> {
        self.container_ready().await?;
        let blob_name = self.blob_name(&self.output_prefix, name);
        Ok(self.container.blob_client(&blob_name).exists().await?)
    }

    async fn get_output_url(&self, name: &str, as_attachment: bool) -> StorageResult<String> {
        self.container_ready().await?;
        let blob_name = self.blob_name(&self.output_prefix, name);
        let disposition = as_attachment.then(|| attachment_disposition(name));
        self.signer.signed_blob_url(
            &self.container_name,
            &blob_name,
            self.sas_ttl,
            disposition.as_deref(),
        )
    }

    fn local_input_dir(&self) -> &Path {
        &self.inputs_dir
    }

    fn local_output_dir(&self) -> &Path {
        &self.outputs_dir
    }
}
