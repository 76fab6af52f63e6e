//! FFprobe video information.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use rallycut_models::VideoMetadata;

use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a video file for duration, resolution, and frame rate.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoMetadata> {
    let probe = ffprobe(path.as_ref()).await?;
    video_metadata_from(&probe)
}

/// Whether the file carries at least one audio stream.
pub async fn has_audio_stream(path: impl AsRef<Path>) -> MediaResult<bool> {
    let probe = ffprobe(path.as_ref()).await?;
    Ok(probe.streams.iter().any(|s| s.codec_type == "audio"))
}

async fn ffprobe(path: &Path) -> MediaResult<FfprobeOutput> {
    if !path.exists() {
        return Err(MediaError::InvalidVideo(format!(
            "file not found: {}",
            path.display()
        )));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::probe_failed(
            "FFprobe exited with non-zero status",
            Some(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        ));
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

/// Map raw ffprobe output onto [`VideoMetadata`].
fn video_metadata_from(probe: &FfprobeOutput) -> MediaResult<VideoMetadata> {
    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::probe_failed("no video stream found", None))?;

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| *d > 0.0)
        .ok_or_else(|| MediaError::probe_failed("could not determine duration", None))?;

    let fps = video_stream
        .avg_frame_rate
        .as_ref()
        .or(video_stream.r_frame_rate.as_ref())
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    Ok(VideoMetadata {
        duration,
        width: video_stream.width.unwrap_or(0),
        height: video_stream.height.unwrap_or(0),
        fps,
    })
}

/// Parse a frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("30/0").is_none());
        assert!(parse_frame_rate("garbage").is_none());
    }

    #[test]
    fn test_metadata_from_probe_json() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{
                "format": { "duration": "20.5" },
                "streams": [
                    { "codec_type": "audio" },
                    { "codec_type": "video", "width": 1920, "height": 1080,
                      "r_frame_rate": "30000/1001", "avg_frame_rate": "30000/1001" }
                ]
            }"#,
        )
        .unwrap();

        let meta = video_metadata_from(&probe).unwrap();
        assert_eq!(meta.duration, 20.5);
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
        assert!((meta.fps - 29.97).abs() < 0.01);

        assert!(probe.streams.iter().any(|s| s.codec_type == "audio"));
    }

    #[test]
    fn test_metadata_requires_video_stream() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{ "format": { "duration": "5.0" }, "streams": [ { "codec_type": "audio" } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            video_metadata_from(&probe),
            Err(MediaError::Probe { .. })
        ));
    }

    #[test]
    fn test_metadata_requires_duration() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{ "format": {}, "streams": [ { "codec_type": "video", "width": 640, "height": 360 } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            video_metadata_from(&probe),
            Err(MediaError::Probe { .. })
        ));
    }
}
