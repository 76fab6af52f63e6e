//! Raw grayscale frame extraction.
//!
//! The motion detector needs a global activity signal, not perceptual
//! fidelity, so frames are sampled at a low rate, downscaled to 160x90, and
//! converted to 8-bit gray before differencing. The output is a headerless
//! concatenation of fixed-size frames.

use std::path::Path;
use tracing::debug;

use crate::command::{stderr_tail, FfmpegCommand};
use crate::error::{MediaError, MediaResult};

/// Width of extracted frames in pixels.
pub const FRAME_WIDTH: u32 = 160;
/// Height of extracted frames in pixels.
pub const FRAME_HEIGHT: u32 = 90;
/// Bytes per extracted frame (one byte per pixel).
pub const FRAME_SIZE: usize = (FRAME_WIDTH * FRAME_HEIGHT) as usize;

/// Dump downscaled grayscale frames of `input` at `sample_fps` into `out_path`.
///
/// The file contains raw `gray` pixel data, [`FRAME_SIZE`] bytes per frame,
/// no container and no headers.
pub async fn extract_gray_frames(
    input: impl AsRef<Path>,
    sample_fps: f64,
    out_path: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let out_path = out_path.as_ref();

    debug!(
        input = %input.display(),
        out = %out_path.display(),
        sample_fps,
        "Extracting raw grayscale frames"
    );

    let filter = format!("fps={sample_fps},scale={FRAME_WIDTH}:{FRAME_HEIGHT},format=gray");
    let cmd = FfmpegCommand::new(input, out_path)
        .video_filter(filter)
        .output_args(["-f", "rawvideo", "-pix_fmt", "gray", "-an"]);

    let output = cmd.output().await?;
    if !output.status.success() {
        return Err(MediaError::extraction_failed(
            "FFmpeg frame extraction exited with non-zero status",
            stderr_tail(&output.stderr),
        ));
    }

    Ok(())
}
