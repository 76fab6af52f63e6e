//! Pipeline orchestration.
//!
//! A run is a straight line: resolve the input (local path or remote URL),
//! persist it, detect motion segments, trim, persist the output. Ownership of
//! the downloaded file transfers to the storage sink once `save_input`
//! returns; until then (and for the trim output) the orchestrator deletes
//! leftovers on failure.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use rallycut_media::{
    detect_motion_segments, fetch_remote_video, trim_video, DownloadError, FetchConfig, MediaError,
};
use rallycut_models::{output_file_name, MotionOptions, PipelineResult};
use rallycut_storage::VideoStorage;

use crate::error::{PipelineError, RunResult};

/// Parameters for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    /// Local input file; takes precedence over `video_url`.
    pub video_path: Option<PathBuf>,
    /// Remote input URL, fetched when no local path is given.
    pub video_url: Option<String>,
    /// Detector configuration.
    pub motion_options: MotionOptions,
    /// Download size limit override.
    pub max_bytes: Option<u64>,
    /// Output filename override; defaults to `trimmed-<uuid>.mp4`.
    pub output_filename: Option<String>,
}

/// Run the motion-trim pipeline.
pub async fn run(
    request: PipelineRequest,
    storage: &dyn VideoStorage,
) -> RunResult<PipelineResult> {
    request.motion_options.validate()?;

    let mut downloaded: Option<PathBuf> = None;
    let input_path = match (&request.video_path, &request.video_url) {
        (Some(path), _) => path.clone(),
        (None, Some(url)) => {
            let fetch_config = request
                .max_bytes
                .map(FetchConfig::with_max_bytes)
                .unwrap_or_default();
            let path = fetch_remote_video(url, storage.local_input_dir(), &fetch_config).await?;
            downloaded = Some(path.clone());
            path
        }
        (None, None) => return Err(DownloadError::MissingSource.into()),
    };

    let input_name = match input_path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => {
            cleanup(downloaded.as_deref()).await;
            return Err(MediaError::InvalidVideo(format!(
                "input path has no file name: {}",
                input_path.display()
            ))
            .into());
        }
    };

    let output_name = request
        .output_filename
        .clone()
        .unwrap_or_else(output_file_name);
    let output_path = storage.local_output_dir().join(&output_name);

    let result = stages(
        storage,
        &input_path,
        &input_name,
        &request.motion_options,
        &output_name,
        &output_path,
    )
    .await;

    if result.is_err() {
        cleanup(Some(&output_path)).await;
        cleanup(downloaded.as_deref()).await;
    }

    result
}

async fn stages(
    storage: &dyn VideoStorage,
    input_path: &Path,
    input_name: &str,
    options: &MotionOptions,
    output_name: &str,
    output_path: &Path,
) -> RunResult<PipelineResult> {
    let stored_input = storage.save_input(input_path, input_name).await?;

    let segments = detect_motion_segments(input_path, options).await?;
    if segments.is_empty() {
        return Err(PipelineError::NoSegments { segments });
    }

    trim_video(input_path, &segments, output_path).await?;
    let stored_output = storage.save_output(output_path, output_name).await?;

    info!(
        input = input_name,
        output = output_name,
        segments = segments.len(),
        kept_secs = segments.iter().map(|s| s.duration()).sum::<f64>(),
        "Pipeline run complete"
    );

    Ok(PipelineResult {
        segments,
        stored_input: Some(stored_input),
        stored_output,
    })
}

/// Best-effort removal of a leftover file.
async fn cleanup(path: Option<&Path>) {
    let Some(path) = path else { return };
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to clean up file"),
    }
}
