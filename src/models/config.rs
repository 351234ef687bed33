//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Hard cap the log store places on one page of events.
const MAX_EVENTS_PER_PAGE: u32 = 10_000;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// AWS endpoint and credential settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// Stack provisioning settings
    #[serde(default)]
    pub setup: SetupConfig,

    /// Demo log group and stream settings
    #[serde(default)]
    pub logs: LogsConfig,

    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,
}

/// AWS connection settings.
///
/// Defaults target LocalStack with its stock test credentials. Each field
/// falls back to the matching `AWS_*` environment variable before the
/// hardcoded default, so a plain `aws configure`-style environment works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Service endpoint URL
    #[serde(default = "defaults::endpoint_url")]
    pub endpoint_url: String,

    /// Access key id
    #[serde(default = "defaults::access_key_id")]
    pub access_key_id: String,

    /// Secret access key
    #[serde(default = "defaults::secret_access_key")]
    pub secret_access_key: String,

    /// Region name
    #[serde(default = "defaults::region")]
    pub region: String,
}

/// Settings for the `setup` provisioning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Bucket that receives the GPX uploads
    #[serde(default = "defaults::bucket")]
    pub bucket: String,

    /// Name of the notification function
    #[serde(default = "defaults::function")]
    pub function: String,

    /// Name of the function's execution role
    #[serde(default = "defaults::role")]
    pub role: String,

    /// Local GPX track uploaded as seed data
    #[serde(default = "defaults::track_file")]
    pub track_file: String,

    /// Prebuilt deployment zip for the notification function
    #[serde(default = "defaults::lambda_zip")]
    pub lambda_zip: String,

    /// How many copies of the track to upload
    #[serde(default = "defaults::upload_count")]
    pub upload_count: u32,

    /// Random bytes per upload key prefix (two hex chars each)
    #[serde(default = "defaults::prefix_bytes")]
    pub prefix_bytes: usize,

    /// Pause between dependent provisioning steps, in seconds
    #[serde(default = "defaults::resource_wait_secs")]
    pub resource_wait_secs: u64,

    /// Pause after wiring the bucket notification, in seconds
    #[serde(default = "defaults::notification_wait_secs")]
    pub notification_wait_secs: u64,
}

/// Settings for the `logs` bootstrap command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    /// Demo log group to create
    #[serde(default = "defaults::group")]
    pub group: String,

    /// Demo log stream to create
    #[serde(default = "defaults::stream")]
    pub stream: String,
}

/// Settings for the `download` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory the tracks are mirrored into
    #[serde(default = "defaults::download_dir")]
    pub dir: String,

    /// Maximum number of log events to fetch in one page
    #[serde(default = "defaults::events")]
    pub events: u32,

    /// Substring a log message must contain to be scraped; defaults to the
    /// track's file name when unset
    #[serde(default)]
    pub filter: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.aws.endpoint_url).map_err(|e| {
            AppError::validation(format!("aws.endpoint_url is not a valid URL: {e}"))
        })?;
        if self.aws.region.trim().is_empty() {
            return Err(AppError::validation("aws.region must not be empty"));
        }
        if self.setup.bucket.trim().is_empty() {
            return Err(AppError::validation("setup.bucket must not be empty"));
        }
        if self.setup.function.trim().is_empty() {
            return Err(AppError::validation("setup.function must not be empty"));
        }
        if self.setup.role.trim().is_empty() {
            return Err(AppError::validation("setup.role must not be empty"));
        }
        if self.setup.upload_count == 0 {
            return Err(AppError::validation("setup.upload_count must be greater than zero"));
        }
        if self.setup.prefix_bytes == 0 {
            return Err(AppError::validation("setup.prefix_bytes must be greater than zero"));
        }
        if self.logs.group.trim().is_empty() {
            return Err(AppError::validation("logs.group must not be empty"));
        }
        if self.logs.stream.trim().is_empty() {
            return Err(AppError::validation("logs.stream must not be empty"));
        }
        if self.download.events == 0 || self.download.events > MAX_EVENTS_PER_PAGE {
            return Err(AppError::validation(format!(
                "download.events must be between 1 and {MAX_EVENTS_PER_PAGE}"
            )));
        }
        Ok(())
    }

    /// CloudWatch group the notification function logs into.
    pub fn lambda_log_group(&self) -> String {
        format!("/aws/lambda/{}", self.setup.function)
    }

    /// Filter substring used when neither flag nor config provides one:
    /// the configured track's file name.
    pub fn default_filter(&self) -> String {
        Path::new(&self.setup.track_file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(".gpx")
            .to_string()
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: defaults::endpoint_url(),
            access_key_id: defaults::access_key_id(),
            secret_access_key: defaults::secret_access_key(),
            region: defaults::region(),
        }
    }
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            bucket: defaults::bucket(),
            function: defaults::function(),
            role: defaults::role(),
            track_file: defaults::track_file(),
            lambda_zip: defaults::lambda_zip(),
            upload_count: defaults::upload_count(),
            prefix_bytes: defaults::prefix_bytes(),
            resource_wait_secs: defaults::resource_wait_secs(),
            notification_wait_secs: defaults::notification_wait_secs(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            group: defaults::group(),
            stream: defaults::stream(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: defaults::download_dir(),
            events: defaults::events(),
            filter: None,
        }
    }
}

/// Default value functions for serde.
mod defaults {
    fn env_or(key: &str, fallback: &str) -> String {
        std::env::var(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn endpoint_url() -> String {
        env_or("AWS_ENDPOINT_URL", "http://localhost:4566")
    }

    pub fn access_key_id() -> String {
        env_or("AWS_ACCESS_KEY_ID", "test")
    }

    pub fn secret_access_key() -> String {
        env_or("AWS_SECRET_ACCESS_KEY", "test")
    }

    pub fn region() -> String {
        env_or("AWS_REGION", "us-east-1")
    }

    pub fn bucket() -> String {
        "gpx-bucket-aws-test".to_string()
    }

    pub fn function() -> String {
        "gpx_lambda_function".to_string()
    }

    pub fn role() -> String {
        "gpx_lambda_role".to_string()
    }

    pub fn track_file() -> String {
        "data/route_framed_synced.gpx".to_string()
    }

    pub fn lambda_zip() -> String {
        "target/lambda/gpxsync-lambda/bootstrap.zip".to_string()
    }

    pub fn upload_count() -> u32 {
        120
    }

    pub fn prefix_bytes() -> usize {
        10
    }

    pub fn resource_wait_secs() -> u64 {
        5
    }

    pub fn notification_wait_secs() -> u64 {
        20
    }

    pub fn group() -> String {
        "gpx-log-group-test2".to_string()
    }

    pub fn stream() -> String {
        "gpx-log-stream-test2".to_string()
    }

    pub fn download_dir() -> String {
        "downloads".to_string()
    }

    pub fn events() -> u32 {
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn validate_default_config_ok() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_bucket() {
        let mut config = Config::default();
        config.setup.bucket = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_upload_count() {
        let mut config = Config::default();
        config.setup.upload_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.aws.endpoint_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_event_page() {
        let mut config = Config::default();
        config.download.events = 20_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn lambda_log_group_follows_function_name() {
        let mut config = Config::default();
        config.setup.function = "gpx_lambda_function".to_string();
        assert_eq!(config.lambda_log_group(), "/aws/lambda/gpx_lambda_function");
    }

    #[test]
    fn default_filter_is_track_file_name() {
        let mut config = Config::default();
        config.setup.track_file = "data/route_framed_synced.gpx".to_string();
        assert_eq!(config.default_filter(), "route_framed_synced.gpx");
    }

    #[test]
    fn load_reads_overrides_and_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[setup]
bucket = "my-bucket"
upload_count = 3

[download]
events = 25
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.setup.bucket, "my-bucket");
        assert_eq!(config.setup.upload_count, 3);
        assert_eq!(config.download.events, 25);
        // Untouched sections keep their defaults.
        assert_eq!(config.setup.function, "gpx_lambda_function");
        assert_eq!(config.logs.group, "gpx-log-group-test2");
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = Config::load_or_default("/nonexistent/gpxsync.toml");
        assert_eq!(config.setup.bucket, "gpx-bucket-aws-test");
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
