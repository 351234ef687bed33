//! CloudWatch Logs operations.

use aws_config::SdkConfig;
use aws_sdk_cloudwatchlogs::Client;
use aws_sdk_cloudwatchlogs::types::OrderBy;
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::LogRecord;

/// Which end of a stream a page of events is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    /// Oldest events first
    EarliestFirst,
    /// Most recent events
    LatestFirst,
}

impl FetchDirection {
    fn start_from_head(self) -> bool {
        matches!(self, FetchDirection::EarliestFirst)
    }
}

/// Log stream summary used for listings and stream selection.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    pub name: String,
    pub last_event: Option<DateTime<Utc>>,
}

/// Client wrapper for log group and stream operations.
pub struct LogsService {
    client: Client,
}

impl LogsService {
    /// Create the service from the shared SDK configuration.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Create a log group, tolerating one that already exists.
    pub async fn create_log_group(&self, group: &str) -> Result<()> {
        match self
            .client
            .create_log_group()
            .log_group_name(group)
            .send()
            .await
        {
            Ok(_) => {
                log::info!("Created log group '{}'", group);
                Ok(())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_resource_already_exists_exception() {
                    log::debug!("Log group '{}' already exists", group);
                    Ok(())
                } else {
                    Err(AppError::logs(service_err))
                }
            }
        }
    }

    /// Create a log stream in `group`, tolerating one that already exists.
    pub async fn create_log_stream(&self, group: &str, stream: &str) -> Result<()> {
        match self
            .client
            .create_log_stream()
            .log_group_name(group)
            .log_stream_name(stream)
            .send()
            .await
        {
            Ok(_) => {
                log::info!("Created log stream '{}/{}'", group, stream);
                Ok(())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_resource_already_exists_exception() {
                    log::debug!("Log stream '{}/{}' already exists", group, stream);
                    Ok(())
                } else {
                    Err(AppError::logs(service_err))
                }
            }
        }
    }

    /// List log group names, optionally restricted to a name prefix.
    pub async fn list_log_groups(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let response = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(prefix.map(str::to_string))
            .send()
            .await
            .map_err(AppError::logs)?;

        Ok(response
            .log_groups()
            .iter()
            .filter_map(|group| group.log_group_name().map(str::to_string))
            .collect())
    }

    /// List the streams of a group, most recently active first.
    pub async fn list_log_streams(&self, group: &str) -> Result<Vec<StreamInfo>> {
        let response = self
            .client
            .describe_log_streams()
            .log_group_name(group)
            .order_by(OrderBy::LastEventTime)
            .descending(true)
            .send()
            .await
            .map_err(AppError::logs)?;

        Ok(response
            .log_streams()
            .iter()
            .filter_map(|stream| {
                stream.log_stream_name().map(|name| StreamInfo {
                    name: name.to_string(),
                    last_event: stream
                        .last_event_timestamp()
                        .and_then(DateTime::from_timestamp_millis),
                })
            })
            .collect())
    }

    /// Fetch one bounded page of events from a stream.
    ///
    /// Events come back in the order the store returns them for the chosen
    /// direction; callers must not re-sort.
    pub async fn fetch_events(
        &self,
        group: &str,
        stream: &str,
        direction: FetchDirection,
        limit: u32,
    ) -> Result<Vec<LogRecord>> {
        let response = self
            .client
            .get_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .start_from_head(direction.start_from_head())
            .limit(limit as i32)
            .send()
            .await
            .map_err(AppError::logs)?;

        Ok(response
            .events()
            .iter()
            .map(|event| {
                LogRecord::from_millis(event.timestamp(), event.message().unwrap_or_default())
            })
            .collect())
    }
}
