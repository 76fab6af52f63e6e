//! FFmpeg CLI wrapper and motion analysis for the RallyCut pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Video probing (duration, resolution, frame rate, audio presence)
//! - Raw grayscale frame extraction at a sampling rate
//! - Motion scoring, smoothing, and segment synthesis
//! - Single-pass trim/concat muxing
//! - Safe streaming download of remote inputs

pub mod command;
pub mod download;
pub mod error;
pub mod extract;
pub mod motion;
pub mod probe;
pub mod trim;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand};
pub use download::{
    fetch_remote_video, DownloadError, FetchConfig, DEFAULT_MAX_DOWNLOAD_BYTES,
};
pub use error::{MediaError, MediaResult};
pub use extract::{extract_gray_frames, FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH};
pub use motion::{build_segments, detect_motion_segments, motion_scores, smooth_scores};
pub use probe::{has_audio_stream, probe_video};
pub use trim::{build_trim_filter, trim_video};
