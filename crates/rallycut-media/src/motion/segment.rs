//! Segment synthesis from smoothed motion scores.
//!
//! Threshold -> run-length -> min-length filter -> pre/post padding -> merge,
//! in that order. Sample index `i` maps to source time `i / sample_fps`; a
//! run that reaches the end of the score array extends to the probed
//! `duration` rather than `len / sample_fps`.

use rallycut_models::TimeRange;

/// Build play segments from a smoothed score sequence.
#[allow(clippy::too_many_arguments)]
pub fn build_segments(
    smoothed: &[f64],
    sample_fps: f64,
    threshold: f64,
    min_segment_length: f64,
    pre_roll: f64,
    post_roll: f64,
    duration: f64,
) -> Vec<TimeRange> {
    // A frame exactly at the threshold is active.
    let mut raw: Vec<TimeRange> = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, &score) in smoothed.iter().enumerate() {
        match (run_start, score >= threshold) {
            (None, true) => run_start = Some(i),
            (Some(start), false) => {
                raw.push(TimeRange::new(
                    start as f64 / sample_fps,
                    i as f64 / sample_fps,
                ));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        raw.push(TimeRange::new(start as f64 / sample_fps, duration));
    }

    let mut merged: Vec<TimeRange> = Vec::new();
    for seg in raw {
        if seg.end - seg.start < min_segment_length {
            continue;
        }
        // Clamping never shortens the opposite end.
        let padded = TimeRange::new(
            (seg.start - pre_roll).max(0.0),
            (seg.end + post_roll).min(duration),
        );
        match merged.last_mut() {
            Some(last) if padded.start <= last.end => {
                last.end = last.end.max(padded.end);
            }
            _ => merged.push(padded),
        }
    }

    merged
}
