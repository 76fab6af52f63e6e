//! Trim and concatenate play segments in a single FFmpeg pass.
//!
//! One `filter_complex` graph trims every segment and concatenates the
//! results, so no intermediate files exist and cuts on non-keyframes join
//! cleanly under the re-encode. Audio chains are built only when the input
//! carries an audio stream.

use std::path::Path;
use tracing::info;

use rallycut_models::TimeRange;

use crate::command::{stderr_tail, FfmpegCommand};
use crate::error::{MediaError, MediaResult};
use crate::probe::has_audio_stream;

/// Produce a single MP4 at `output` covering only `segments` of `input`.
///
/// The output is re-encoded (H.264, and AAC when the input has audio); its
/// duration approximates the summed segment durations within the muxer's
/// frame-boundary rounding.
pub async fn trim_video(
    input: impl AsRef<Path>,
    segments: &[TimeRange],
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if segments.is_empty() {
        return Err(MediaError::NoSegmentsToTrim);
    }

    let with_audio = has_audio_stream(input).await?;
    let filter = build_trim_filter(segments, with_audio);

    info!(
        input = %input.display(),
        output = %output.display(),
        segments = segments.len(),
        with_audio,
        "Trimming video"
    );

    let mut cmd = FfmpegCommand::new(input, output)
        .filter_complex(filter)
        .output_args(["-map", "[outv]"]);
    if with_audio {
        cmd = cmd.output_args(["-map", "[outa]", "-c:a", "aac", "-b:a", "128k"]);
    }
    cmd = cmd.output_args([
        "-c:v",
        "libx264",
        "-preset",
        "veryfast",
        "-crf",
        "20",
        "-movflags",
        "+faststart",
    ]);

    let result = cmd.output().await?;
    if !result.status.success() {
        return Err(MediaError::mux_failed(
            "FFmpeg trim/concat exited with non-zero status",
            stderr_tail(&result.stderr),
        ));
    }

    Ok(())
}

/// Build the trim+concat filter graph.
///
/// Shape: `[0:v]trim=start=s:end=e,setpts=PTS-STARTPTS[v0]; ...` plus
/// matching `atrim`/`asetpts` chains and interleaved `[vi][ai]` concat inputs
/// when `with_audio` is set. `[outv]` is always produced; `[outa]` only with
/// audio.
pub fn build_trim_filter(segments: &[TimeRange], with_audio: bool) -> String {
    let mut parts = Vec::with_capacity(segments.len() * 2 + 1);

    for (i, seg) in segments.iter().enumerate() {
        parts.push(format!(
            "[0:v]trim=start={:.3}:end={:.3},setpts=PTS-STARTPTS[v{}]",
            seg.start, seg.end, i
        ));
        if with_audio {
            parts.push(format!(
                "[0:a]atrim=start={:.3}:end={:.3},asetpts=PTS-STARTPTS[a{}]",
                seg.start, seg.end, i
            ));
        }
    }

    let inputs: String = (0..segments.len())
        .map(|i| {
            if with_audio {
                format!("[v{i}][a{i}]")
            } else {
                format!("[v{i}]")
            }
        })
        .collect();

    let (audio_flag, outputs) = if with_audio {
        (1, "[outv][outa]")
    } else {
        (0, "[outv]")
    };
    parts.push(format!(
        "{}concat=n={}:v=1:a={}{}",
        inputs,
        segments.len(),
        audio_flag,
        outputs
    ));

    parts.join(";")
}
