//! gpxsync CLI
//!
//! Local execution entry point. The notification function deploys
//! separately as `gpxsync-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gpxsync::{
    error::Result,
    models::Config,
    pipeline::{self, DownloadArgs},
};

/// gpxsync - S3 notification demo stack
#[derive(Parser, Debug)]
#[command(
    name = "gpxsync",
    version,
    about = "Provisions an S3-to-Lambda GPX demo stack and mirrors uploads back out of its logs"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "gpxsync.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Provision bucket, role, and function, then seed GPX uploads
    Setup {
        /// Bucket to create (default from config)
        #[arg(long)]
        bucket: Option<String>,

        /// Notification function name (default from config)
        #[arg(long)]
        function: Option<String>,

        /// Execution role name (default from config)
        #[arg(long)]
        role: Option<String>,
    },

    /// Ensure the demo log group exists and list groups and streams
    Logs,

    /// Scrape S3 notifications from a log stream and download the tracks
    Download {
        /// Log group to scrape (default: the function's group)
        #[arg(long)]
        group: Option<String>,

        /// Log stream to scrape (default: the most recently active)
        #[arg(long)]
        stream: Option<String>,

        /// Directory to download tracks into
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Maximum number of log events to fetch
        #[arg(long)]
        events: Option<u32>,

        /// Fetch the earliest events instead of the latest
        #[arg(long)]
        earliest: bool,

        /// Substring a log message must contain to be scraped
        #[arg(long)]
        filter: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("gpxsync starting...");

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Setup {
            bucket,
            function,
            role,
        } => {
            if let Some(bucket) = bucket {
                config.setup.bucket = bucket;
            }
            if let Some(function) = function {
                config.setup.function = function;
            }
            if let Some(role) = role {
                config.setup.role = role;
            }
            config.validate()?;

            pipeline::run_setup(&config).await?;

            log::info!("Setup complete!");
        }

        Command::Logs => {
            config.validate()?;
            pipeline::run_logs(&config).await?;
        }

        Command::Download {
            group,
            stream,
            dir,
            events,
            earliest,
            filter,
        } => {
            config.validate()?;

            let args = DownloadArgs {
                group: group.unwrap_or_else(|| config.lambda_log_group()),
                stream,
                dir: dir.unwrap_or_else(|| PathBuf::from(&config.download.dir)),
                events: events.unwrap_or(config.download.events),
                earliest,
                filter: filter
                    .or_else(|| config.download.filter.clone())
                    .unwrap_or_else(|| config.default_filter()),
            };

            pipeline::run_download(&config, &args).await?;

            log::info!("Download complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    log::info!("Done!");

    Ok(())
}
