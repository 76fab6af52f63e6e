//! Per-frame motion scores from a raw grayscale stream.

/// Compute motion scores for a raw frame buffer.
///
/// Returns one score per whole frame in `buf` (a trailing partial frame is
/// ignored). The first frame scores 0; every later frame scores the mean
/// absolute difference against its predecessor, normalized to [0, 1].
pub fn motion_scores(buf: &[u8], frame_size: usize) -> Vec<f64> {
    if frame_size == 0 {
        return Vec::new();
    }

    let frames = buf.len() / frame_size;
    if frames == 0 {
        return Vec::new();
    }

    let mut scores = Vec::with_capacity(frames);
    scores.push(0.0);

    for i in 1..frames {
        let prev = &buf[(i - 1) * frame_size..i * frame_size];
        let cur = &buf[i * frame_size..(i + 1) * frame_size];
        let sum: u64 = cur
            .iter()
            .zip(prev)
            .map(|(a, b)| a.abs_diff(*b) as u64)
            .sum();
        scores.push(sum as f64 / frame_size as f64 / 255.0);
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: usize = 4;

    #[test]
    fn test_empty_and_partial_buffers() {
        assert!(motion_scores(&[], F).is_empty());
        // Less than one frame
        assert!(motion_scores(&[1, 2, 3], F).is_empty());
    }

    #[test]
    fn test_single_frame_scores_zero() {
        assert_eq!(motion_scores(&[10, 20, 30, 40], F), vec![0.0]);
    }

    #[test]
    fn test_identical_frames_score_zero() {
        // Consecutive bitwise-equal frames all score 0.
        let frame = [7u8, 7, 7, 7];
        let buf: Vec<u8> = frame.iter().copied().cycle().take(F * 5).collect();
        let scores = motion_scores(&buf, F);
        assert_eq!(scores.len(), 5);
        assert!(scores.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_full_inversion_scores_one() {
        // All-zero frame followed by all-255 frame.
        let mut buf = vec![0u8; F];
        buf.extend(vec![255u8; F]);
        let scores = motion_scores(&buf, F);
        assert_eq!(scores, vec![0.0, 1.0]);
    }

    #[test]
    fn test_score_count_and_first_zero() {
        // |scores| = floor(|buf| / F), scores[0] = 0.
        let buf = vec![128u8; F * 3 + 2];
        let scores = motion_scores(&buf, F);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], 0.0);
    }

    #[test]
    fn test_partial_difference() {
        // One of four pixels changes by 255: score = 255/4/255 = 0.25.
        let buf = vec![0, 0, 0, 0, 255, 0, 0, 0];
        let scores = motion_scores(&buf, F);
        assert!((scores[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_difference_is_symmetric() {
        let up = motion_scores(&[0, 0, 0, 0, 100, 100, 100, 100], F);
        let down = motion_scores(&[100, 100, 100, 100, 0, 0, 0, 0], F);
        assert_eq!(up[1], down[1]);
    }
}
