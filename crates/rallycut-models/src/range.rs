//! Time ranges in seconds, relative to the source video.

use serde::{Deserialize, Serialize};

/// A half-open span of source time, `start < end`, both in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl TimeRange {
    /// Create a new range.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Duration of this range in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether `other` starts at or before this range ends.
    pub fn touches(&self, other: &TimeRange) -> bool {
        other.start <= self.end
    }
}
