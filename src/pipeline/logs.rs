//! Log group bootstrap and inspection.
//!
//! Ensures the demo group and stream exist, then lists every group in the
//! account with its streams. The listing is how you find the notification
//! function's own group before running a download.

use crate::error::Result;
use crate::models::Config;
use crate::services::{self, LogsService};

/// Ensure the demo group/stream exist, then print what the account holds.
pub async fn run_logs(config: &Config) -> Result<()> {
    let sdk_config = services::load_sdk_config(&config.aws).await;
    let logs = LogsService::new(&sdk_config);

    logs.create_log_group(&config.logs.group).await?;
    logs.create_log_stream(&config.logs.group, &config.logs.stream)
        .await?;

    let groups = logs.list_log_groups(None).await?;
    if groups.is_empty() {
        log::warn!("No log groups found");
        return Ok(());
    }

    for group in &groups {
        log::info!("Log group: {}", group);
        let streams = logs.list_log_streams(group).await?;
        if streams.is_empty() {
            log::info!("    (no streams)");
            continue;
        }
        for stream in streams {
            match stream.last_event {
                Some(ts) => log::info!("    {} (last event {})", stream.name, ts.to_rfc3339()),
                None => log::info!("    {} (no events)", stream.name),
            }
        }
    }

    Ok(())
}
