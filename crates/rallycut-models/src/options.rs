//! Motion detector configuration.
//!
//! `MotionOptions` is the validated config the detector consumes.
//! `RawMotionOptions` is the adapter for untyped request payloads (form
//! fields, query strings); coercion and defaulting happen there, never in the
//! detector itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default sampling rate in frames per second of source time.
pub const DEFAULT_SAMPLE_FPS: f64 = 2.0;
/// Default minimum per-frame score to count a frame as active.
pub const DEFAULT_THRESHOLD: f64 = 0.02;
/// Default minimum raw segment length in seconds.
pub const DEFAULT_MIN_SEGMENT_LENGTH: f64 = 3.0;
/// Default padding before each surviving segment, in seconds.
pub const DEFAULT_PRE_ROLL: f64 = 1.0;
/// Default padding after each surviving segment, in seconds.
pub const DEFAULT_POST_ROLL: f64 = 1.0;
/// Default rolling-average window over the score sequence.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// An option field outside its accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid option `{field}`: {reason}")]
pub struct ConfigError {
    /// Name of the rejected field.
    pub field: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

impl ConfigError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Configuration for the motion detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionOptions {
    /// Frames sampled per second of source time.
    pub sample_fps: f64,
    /// Minimum smoothed score for a frame to count as active, in [0, 1].
    pub threshold: f64,
    /// Raw segments shorter than this many seconds are dropped.
    pub min_segment_length: f64,
    /// Seconds of padding added before each surviving segment.
    pub pre_roll: f64,
    /// Seconds of padding added after each surviving segment.
    pub post_roll: f64,
    /// Window size for the rolling average over scores.
    pub smoothing_window: usize,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            sample_fps: DEFAULT_SAMPLE_FPS,
            threshold: DEFAULT_THRESHOLD,
            min_segment_length: DEFAULT_MIN_SEGMENT_LENGTH,
            pre_roll: DEFAULT_PRE_ROLL,
            post_roll: DEFAULT_POST_ROLL,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl MotionOptions {
    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_fps.is_finite() || self.sample_fps <= 0.0 {
            return Err(ConfigError::new("sampleFps", "must be a positive number"));
        }
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::new("threshold", "must be in [0, 1]"));
        }
        if !self.min_segment_length.is_finite() || self.min_segment_length < 0.0 {
            return Err(ConfigError::new(
                "minSegmentLength",
                "must be non-negative",
            ));
        }
        if !self.pre_roll.is_finite() || self.pre_roll < 0.0 {
            return Err(ConfigError::new("preRoll", "must be non-negative"));
        }
        if !self.post_roll.is_finite() || self.post_roll < 0.0 {
            return Err(ConfigError::new("postRoll", "must be non-negative"));
        }
        if self.smoothing_window < 1 {
            return Err(ConfigError::new(
                "smoothingWindow",
                "must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Untyped request payload for motion options, all fields optional strings.
///
/// HTTP and function-trigger layers deserialize into this and call
/// [`RawMotionOptions::coerce`] to get a usable [`MotionOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMotionOptions {
    pub sample_fps: Option<String>,
    pub threshold: Option<String>,
    pub min_segment_length: Option<String>,
    pub pre_roll: Option<String>,
    pub post_roll: Option<String>,
    pub smoothing_window: Option<String>,
}

impl RawMotionOptions {
    /// Coerce string fields into typed options.
    ///
    /// Floats use "parse float, default on NaN-or-zero"; the smoothing window
    /// is integer-coerced the same way.
    pub fn coerce(&self) -> MotionOptions {
        let defaults = MotionOptions::default();
        MotionOptions {
            sample_fps: parse_or(self.sample_fps.as_deref(), defaults.sample_fps),
            threshold: parse_or(self.threshold.as_deref(), defaults.threshold),
            min_segment_length: parse_or(
                self.min_segment_length.as_deref(),
                defaults.min_segment_length,
            ),
            pre_roll: parse_or(self.pre_roll.as_deref(), defaults.pre_roll),
            post_roll: parse_or(self.post_roll.as_deref(), defaults.post_roll),
            smoothing_window: parse_int_or(
                self.smoothing_window.as_deref(),
                defaults.smoothing_window,
            ),
        }
    }
}

/// Parse a float, falling back to `default` when absent, unparseable,
/// non-finite, or zero.
fn parse_or(value: Option<&str>, default: f64) -> f64 {
    value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(default)
}

/// Integer variant of [`parse_or`]; negative values fall back to `default`.
fn parse_int_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 1.0)
        .map(|v| v as usize)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = MotionOptions::default();
        assert_eq!(opts.sample_fps, 2.0);
        assert_eq!(opts.threshold, 0.02);
        assert_eq!(opts.min_segment_length, 3.0);
        assert_eq!(opts.pre_roll, 1.0);
        assert_eq!(opts.post_roll, 1.0);
        assert_eq!(opts.smoothing_window, 3);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut opts = MotionOptions {
            sample_fps: 0.0,
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().field, "sampleFps");

        opts = MotionOptions {
            threshold: 1.5,
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().field, "threshold");

        opts = MotionOptions {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().field, "threshold");

        opts = MotionOptions {
            pre_roll: -1.0,
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().field, "preRoll");

        opts = MotionOptions {
            smoothing_window: 0,
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().field, "smoothingWindow");
    }

    #[test]
    fn test_threshold_bounds_inclusive() {
        let zero = MotionOptions {
            threshold: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_ok());
        let one = MotionOptions {
            threshold: 1.0,
            ..Default::default()
        };
        assert!(one.validate().is_ok());
    }

    #[test]
    fn test_coerce_parses_strings() {
        let raw = RawMotionOptions {
            sample_fps: Some("4".into()),
            threshold: Some("0.05".into()),
            min_segment_length: Some("2.5".into()),
            pre_roll: Some("0.5".into()),
            post_roll: Some("1.5".into()),
            smoothing_window: Some("5".into()),
        };
        let opts = raw.coerce();
        assert_eq!(opts.sample_fps, 4.0);
        assert_eq!(opts.threshold, 0.05);
        assert_eq!(opts.min_segment_length, 2.5);
        assert_eq!(opts.pre_roll, 0.5);
        assert_eq!(opts.post_roll, 1.5);
        assert_eq!(opts.smoothing_window, 5);
    }

    #[test]
    fn test_coerce_defaults_on_garbage_zero_and_nan() {
        let raw = RawMotionOptions {
            sample_fps: Some("not-a-number".into()),
            threshold: Some("0".into()),
            min_segment_length: Some("NaN".into()),
            pre_roll: None,
            post_roll: Some("".into()),
            smoothing_window: Some("-2".into()),
        };
        let opts = raw.coerce();
        assert_eq!(opts, MotionOptions::default());
    }

    #[test]
    fn test_coerce_truncates_window() {
        let raw = RawMotionOptions {
            smoothing_window: Some("4.9".into()),
            ..Default::default()
        };
        assert_eq!(raw.coerce().smoothing_window, 4);
    }

    #[test]
    fn test_raw_deserializes_camel_case() {
        let raw: RawMotionOptions = serde_json::from_str(
            r#"{"sampleFps":"3","minSegmentLength":"4","smoothingWindow":"7"}"#,
        )
        .unwrap();
        let opts = raw.coerce();
        assert_eq!(opts.sample_fps, 3.0);
        assert_eq!(opts.min_segment_length, 4.0);
        assert_eq!(opts.smoothing_window, 7);
    }
}
