//! Motion detection over a video file.
//!
//! The detector runs offline over the whole file: probe the source, dump a
//! downsampled grayscale frame stream into a scratch file, score consecutive
//! frame differences, smooth, and synthesize padded play segments.

pub mod score;
pub mod segment;
pub mod smooth;

pub use score::motion_scores;
pub use segment::build_segments;
pub use smooth::smooth_scores;

use std::path::Path;
use tracing::{debug, info};

use rallycut_models::{MotionOptions, TimeRange};

use crate::error::MediaResult;
use crate::extract::{extract_gray_frames, FRAME_SIZE};
use crate::probe::probe_video;

/// Detect active play segments in the video at `path`.
///
/// The raw frame scratch file lives in a temporary directory that is removed
/// on every exit path, success or failure.
pub async fn detect_motion_segments(
    path: impl AsRef<Path>,
    options: &MotionOptions,
) -> MediaResult<Vec<TimeRange>> {
    let path = path.as_ref();
    let metadata = probe_video(path).await?;

    let scratch = tempfile::tempdir()?;
    let raw_path = scratch.path().join("frames.gray");

    extract_gray_frames(path, options.sample_fps, &raw_path).await?;
    let buf = tokio::fs::read(&raw_path).await?;

    let scores = motion_scores(&buf, FRAME_SIZE);
    debug!(
        frames = scores.len(),
        duration = metadata.duration,
        "Scored raw frame stream"
    );

    let smoothed = smooth_scores(&scores, options.smoothing_window);
    let segments = build_segments(
        &smoothed,
        options.sample_fps,
        options.threshold,
        options.min_segment_length,
        options.pre_roll,
        options.post_roll,
        metadata.duration,
    );

    info!(
        input = %path.display(),
        segments = segments.len(),
        kept_secs = segments.iter().map(|s| s.duration()).sum::<f64>(),
        "Motion detection complete"
    );

    Ok(segments)
}
