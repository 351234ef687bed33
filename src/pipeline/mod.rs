//! High-level operations behind the CLI subcommands.
//!
//! - [`run_setup`]: provision bucket, role, and function, then seed uploads
//! - [`run_logs`]: bootstrap the demo log group and list what the account holds
//! - [`run_download`]: scrape notifications and mirror the tracks locally

pub mod download;
pub mod extract;
pub mod logs;
pub mod setup;

pub use download::{DownloadArgs, run_download};
pub use extract::{ExtractError, ExtractOutcome, extract_object_refs};
pub use logs::run_logs;
pub use setup::run_setup;
