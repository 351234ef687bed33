//! S3 event notification payload types.
//!
//! The field names and nesting mirror the notification documents S3 emits;
//! they are an external schema and must not be renamed.

use serde::Deserialize;

/// One object-created record inside a notification document.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Record {
    /// Event time as reported by S3 (ISO 8601)
    #[serde(rename = "eventTime")]
    pub event_time: String,

    /// Bucket and object the event refers to
    pub s3: S3Entity,
}

/// The `s3` entity of a notification record.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

/// Bucket information within a notification record.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

/// Object information within a notification record.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    pub key: String,
}
