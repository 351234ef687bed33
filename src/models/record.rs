//! Log records and extracted object references.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry fetched from a log stream.
///
/// The message body is opaque: it may or may not carry a notification
/// payload. Records live only as long as the page they were fetched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Event timestamp, when the log store reported one
    pub timestamp: Option<DateTime<Utc>>,

    /// Raw message body
    pub message: String,
}

impl LogRecord {
    /// Create a record from a millisecond epoch timestamp and a message.
    pub fn from_millis(millis: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            timestamp: millis.and_then(DateTime::from_timestamp_millis),
            message: message.into(),
        }
    }
}

/// Reference to an S3 object pulled out of a notification payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectRef {
    /// Bucket holding the object
    pub bucket: String,

    /// Object key, with `%5C` artifacts already normalized to backslashes
    pub key: String,

    /// Event time exactly as the notification payload reported it
    pub event_timestamp: String,
}

impl ObjectRef {
    /// Destination path for this object under `base`.
    ///
    /// Key segments become subdirectories. Rooted and parent-dir components
    /// are dropped so a key can never escape the download directory.
    pub fn download_path(&self, base: &Path) -> PathBuf {
        let mut path = base.to_path_buf();
        for component in Path::new(&self.key).components() {
            if let Component::Normal(part) = component {
                path.push(part);
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_ref(key: &str) -> ObjectRef {
        ObjectRef {
            bucket: "b1".to_string(),
            key: key.to_string(),
            event_timestamp: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn from_millis_converts_epoch() {
        let record = LogRecord::from_millis(Some(1_704_067_200_000), "hello");
        assert_eq!(
            record.timestamp.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(record.message, "hello");
    }

    #[test]
    fn from_millis_tolerates_missing_timestamp() {
        let record = LogRecord::from_millis(None, "hello");
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn download_path_nests_key_segments() {
        let path = object_ref("abc123/route.gpx").download_path(Path::new("downloads"));
        assert_eq!(path, PathBuf::from("downloads/abc123/route.gpx"));
    }

    #[test]
    fn download_path_drops_parent_and_root_components() {
        let escape = object_ref("../../etc/passwd").download_path(Path::new("downloads"));
        assert_eq!(escape, PathBuf::from("downloads/etc/passwd"));

        let rooted = object_ref("/abs/route.gpx").download_path(Path::new("downloads"));
        assert_eq!(rooted, PathBuf::from("downloads/abs/route.gpx"));
    }

    #[test]
    fn download_path_keeps_backslash_inside_segment() {
        // A normalized Windows-style key is one segment on Unix.
        let path = object_ref("a\\b.gpx").download_path(Path::new("downloads"));
        assert_eq!(path, PathBuf::from("downloads/a\\b.gpx"));
    }
}
