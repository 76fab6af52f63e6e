//! Video metadata and stored artifact descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::range::TimeRange;

/// Properties of a probed video file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Duration in seconds.
    pub duration: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate (fps).
    pub fps: f64,
}

/// Descriptor for an artifact persisted by the storage sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredVideo {
    /// Artifact name (filename or blob name without prefix).
    pub name: String,
    /// Dereferenceable location of the artifact.
    pub url: String,
    /// Variant of `url` that forces attachment disposition, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Size in bytes, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modification time, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl StoredVideo {
    /// Create a descriptor with just a name and URL.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            download_url: None,
            size: None,
            last_modified: None,
        }
    }
}

/// Result of a full trim pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Detected play segments, in order.
    pub segments: Vec<TimeRange>,
    /// Where the input artifact was persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_input: Option<StoredVideo>,
    /// Where the trimmed output was persisted.
    pub stored_output: StoredVideo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_video_serializes_camel_case() {
        let stored = StoredVideo {
            size: Some(1024),
            ..StoredVideo::new("clip.mp4", "/uploads/processed/clip.mp4")
        };
        let json = serde_json::to_string(&stored).unwrap();
        assert!(json.contains(r#""name":"clip.mp4""#));
        assert!(json.contains(r#""size":1024"#));
        assert!(!json.contains("downloadUrl"), "absent fields are omitted");
    }

    #[test]
    fn test_pipeline_result_shape() {
        let result = PipelineResult {
            segments: vec![TimeRange::new(2.0, 7.0)],
            stored_input: None,
            stored_output: StoredVideo::new("out.mp4", "/uploads/processed/out.mp4"),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""storedOutput""#));
        assert!(!json.contains("storedInput"));
    }
}
