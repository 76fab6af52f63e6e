//! Streaming HTTP download of remote video inputs.
//!
//! Remote inputs are untrusted: the fetcher enforces scheme, content type,
//! redirect count, and byte limits, and never leaves a partial file behind.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

/// Default download size limit (100 MiB).
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Default per-connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum redirects followed before giving up.
const MAX_REDIRECTS: usize = 2;

/// File extensions accepted for remote inputs.
const ALLOWED_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mov", "avi"];

/// Errors raised while fetching a remote video.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("unsupported URL: {0}")]
    UnsupportedScheme(String),

    #[error("too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("download exceeds size limit of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("server responded with status {0}")]
    Http(u16),

    #[error("No video provided")]
    MissingSource,

    #[error("network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// HTTP status a consumer-facing layer should map this failure to.
    pub fn status_code(&self) -> u16 {
        match self {
            DownloadError::UnsupportedScheme(_) | DownloadError::MissingSource => 400,
            DownloadError::TooLarge { .. } => 413,
            DownloadError::UnsupportedType(_) => 415,
            DownloadError::TooManyRedirects(_)
            | DownloadError::Http(_)
            | DownloadError::Network(_)
            | DownloadError::Io(_) => 502,
        }
    }
}

/// Fetch limits and timeouts.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Reject downloads larger than this many bytes.
    pub max_bytes: u64,
    /// Per-connection timeout.
    pub connect_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Config with a custom byte limit and default timeout.
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            ..Default::default()
        }
    }
}

/// Stream the video at `url` into `dest_dir`, returning the local path.
///
/// Writes to `dest_dir/remote-<uuid><ext>`. The partial file is deleted on
/// any failure.
pub async fn fetch_remote_video(
    url: &str,
    dest_dir: impl AsRef<Path>,
    config: &FetchConfig,
) -> Result<PathBuf, DownloadError> {
    let dest_dir = dest_dir.as_ref();

    let parsed = reqwest::Url::parse(url)
        .map_err(|_| DownloadError::UnsupportedScheme(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DownloadError::UnsupportedScheme(url.to_string()));
    }

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|e| DownloadError::Network(e.to_string()))?;

    info!(url, "Fetching remote video");

    let response = client
        .get(parsed.clone())
        .send()
        .await
        .map_err(map_request_error)?;

    let status = response.status().as_u16();
    if status >= 400 {
        return Err(DownloadError::Http(status));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(normalize_content_type)
        .unwrap_or_default();
    if !is_acceptable_content_type(&content_type, parsed.path()) {
        return Err(DownloadError::UnsupportedType(content_type));
    }

    if let Some(declared) = response.content_length() {
        if declared > config.max_bytes {
            return Err(DownloadError::TooLarge {
                limit: config.max_bytes,
            });
        }
    }

    let ext = infer_extension(parsed.path(), &content_type);
    let dest = dest_dir.join(format!("remote-{}{}", Uuid::new_v4(), ext));

    match stream_to_file(response, &dest, config.max_bytes).await {
        Ok(written) => {
            info!(
                dest = %dest.display(),
                size_mb = written as f64 / (1024.0 * 1024.0),
                "Downloaded remote video"
            );
            Ok(dest)
        }
        Err(e) => {
            // Never leave a partial file behind.
            if let Err(rm) = tokio::fs::remove_file(&dest).await {
                if rm.kind() != std::io::ErrorKind::NotFound {
                    warn!(dest = %dest.display(), error = %rm, "Failed to remove partial download");
                }
            }
            Err(e)
        }
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    dest: &Path,
    max_bytes: u64,
) -> Result<u64, DownloadError> {
    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::Network(e.to_string()))?;
        written += chunk.len() as u64;
        // The declared length may lie; enforce the limit while streaming too.
        if written > max_bytes {
            return Err(DownloadError::TooLarge { limit: max_bytes });
        }
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(written)
}

fn map_request_error(e: reqwest::Error) -> DownloadError {
    if e.is_redirect() {
        DownloadError::TooManyRedirects(MAX_REDIRECTS)
    } else {
        DownloadError::Network(e.to_string())
    }
}

/// Strip parameters and lowercase, e.g. `Video/MP4; charset=x` -> `video/mp4`.
fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_lowercase()
}

/// Accept `video/*`, or `application/octet-stream` when the URL path carries
/// an allowed video extension.
fn is_acceptable_content_type(content_type: &str, url_path: &str) -> bool {
    if content_type.starts_with("video/") {
        return true;
    }
    content_type == "application/octet-stream" && path_extension(url_path).is_some()
}

/// Allowed extension of a URL path, lowercased without the dot.
fn path_extension(url_path: &str) -> Option<String> {
    let name = url_path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Pick the stored file extension from the URL path, then the content type,
/// defaulting to `.mp4`.
fn infer_extension(url_path: &str, content_type: &str) -> String {
    if let Some(ext) = path_extension(url_path) {
        return format!(".{ext}");
    }
    match content_type {
        "video/webm" => ".webm".to_string(),
        "video/quicktime" => ".mov".to_string(),
        "video/x-msvideo" => ".avi".to_string(),
        _ => ".mp4".to_string(),
    }
}
