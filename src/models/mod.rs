//! Domain models for the gpxsync application.

mod config;
mod notification;
mod record;

pub use config::{AwsConfig, Config, DownloadConfig, LogsConfig, SetupConfig};
pub use notification::{S3Bucket, S3Entity, S3Object, S3Record};
pub use record::{LogRecord, ObjectRef};
