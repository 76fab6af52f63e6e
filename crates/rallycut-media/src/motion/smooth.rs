//! Rolling-average smoothing over the score sequence.

/// Smooth `scores` with a symmetric rolling average of size `window`.
///
/// `window <= 1` returns an unchanged copy. At the boundaries the divisor is
/// the number of values actually inside the window, not `window`. The input
/// is never mutated; the result is always a fresh vector.
pub fn smooth_scores(scores: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return scores.to_vec();
    }

    let half = window / 2;
    let n = scores.len();

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(n);
            let slice = &scores[lo..hi];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}
