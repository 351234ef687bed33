//! Notification scraping and track mirroring.
//!
//! Reads one page of events from the notification function's log stream,
//! extracts the object references embedded in them, and downloads every
//! referenced track into a local directory tree.

use std::path::PathBuf;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::extract::extract_object_refs;
use crate::services::{self, FetchDirection, LogsService, S3Service};
use crate::utils::progress_bar;

/// Options resolved from CLI flags and config for one download run.
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    /// Log group to scrape
    pub group: String,

    /// Log stream to scrape; `None` picks the most recently active one
    pub stream: Option<String>,

    /// Directory the tracks are mirrored into
    pub dir: PathBuf,

    /// Maximum number of log events to fetch
    pub events: u32,

    /// Fetch the earliest events instead of the latest
    pub earliest: bool,

    /// Substring a log message must contain to be scraped
    pub filter: String,
}

/// Scrape notification payloads from a log stream and download every track
/// they reference. Duplicate references overwrite the same local file.
pub async fn run_download(config: &Config, args: &DownloadArgs) -> Result<()> {
    let sdk_config = services::load_sdk_config(&config.aws).await;
    let logs = LogsService::new(&sdk_config);
    let s3 = S3Service::new(&sdk_config);

    let streams = logs.list_log_streams(&args.group).await?;
    if streams.is_empty() {
        log::warn!("No log streams found in group '{}'", args.group);
        return Ok(());
    }
    for stream in &streams {
        log::info!("Found log stream: {}", stream.name);
    }

    let stream_name = match &args.stream {
        Some(name) => name.clone(),
        // Streams come back ordered by last event, newest first.
        None => streams[0].name.clone(),
    };

    let direction = if args.earliest {
        FetchDirection::EarliestFirst
    } else {
        FetchDirection::LatestFirst
    };

    let records = logs
        .fetch_events(&args.group, &stream_name, direction, args.events)
        .await?;
    log::info!("Fetched {} log events from '{}'", records.len(), stream_name);

    let outcome = extract_object_refs(&records, &args.filter);
    if outcome.malformed_payloads > 0 || outcome.missing_fields > 0 {
        log::warn!(
            "Skipped {} malformed payloads and {} incomplete records",
            outcome.malformed_payloads,
            outcome.missing_fields
        );
    }

    if outcome.refs.is_empty() {
        log::warn!("No GPX files found in the log stream");
        return Ok(());
    }

    tokio::fs::create_dir_all(&args.dir).await?;

    let bar = progress_bar(outcome.refs.len() as u64);
    for object_ref in &outcome.refs {
        let dest = object_ref.download_path(&args.dir);
        s3.download_file(&object_ref.bucket, &object_ref.key, &dest)
            .await?;
        bar.inc(1);
    }
    bar.finish();

    log::info!(
        "Downloaded {} files to {}",
        outcome.refs.len(),
        args.dir.display()
    );
    Ok(())
}
