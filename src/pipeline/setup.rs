//! Stack provisioning pipeline.
//!
//! Creates the bucket, execution role, and notification function, wires S3
//! object-created events to the function, then seeds the bucket with GPX
//! uploads so notifications start flowing into the function's log stream.

use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::{self, IamService, LambdaService, S3Service};
use crate::utils::{progress_bar, random_hex};

/// Run the full provisioning sequence.
pub async fn run_setup(config: &Config) -> Result<()> {
    let track_file = Path::new(&config.setup.track_file);
    if !track_file.exists() {
        return Err(AppError::config(format!(
            "track file not found at {}; set setup.track_file or place a GPX file there",
            track_file.display()
        )));
    }

    let zip_path = Path::new(&config.setup.lambda_zip);
    if !zip_path.exists() {
        return Err(AppError::config(format!(
            "deployment zip not found at {}; build it with `cargo lambda build --release --no-default-features --features lambda` first",
            zip_path.display()
        )));
    }

    let sdk_config = services::load_sdk_config(&config.aws).await;
    let s3 = S3Service::new(&sdk_config);
    let iam = IamService::new(&sdk_config);
    let lambda = LambdaService::new(&sdk_config);

    // Fixed pauses between dependent steps; there is no waiter support for
    // role and permission propagation on LocalStack.
    let wait = Duration::from_secs(config.setup.resource_wait_secs);

    s3.create_bucket(&config.setup.bucket).await?;
    let buckets = s3.list_buckets().await?;
    log::info!("Buckets: {}", buckets.join(", "));

    let role_arn = iam.create_lambda_role(&config.setup.role).await?;
    tokio::time::sleep(wait).await;

    let function_arn = lambda
        .create_function(&config.setup.function, &role_arn, zip_path)
        .await?;
    tokio::time::sleep(wait).await;

    lambda
        .allow_bucket_invocation(&config.setup.function, &config.setup.bucket)
        .await?;
    tokio::time::sleep(wait).await;

    s3.configure_lambda_notification(&config.setup.bucket, &function_arn)
        .await?;

    log::info!(
        "Waiting {}s for the notification wiring to settle...",
        config.setup.notification_wait_secs
    );
    tokio::time::sleep(Duration::from_secs(config.setup.notification_wait_secs)).await;

    upload_tracks(&s3, config, track_file).await?;

    let objects = s3.list_objects(&config.setup.bucket).await?;
    log::info!(
        "Bucket '{}' now holds {} objects",
        config.setup.bucket,
        objects.len()
    );

    Ok(())
}

/// Upload `upload_count` copies of the track under random key prefixes.
///
/// Each upload lands as `<hex-prefix>/<file-name>` and fires one
/// object-created notification.
async fn upload_tracks(s3: &S3Service, config: &Config, track_file: &Path) -> Result<()> {
    let file_name = track_file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::config("setup.track_file has no file name"))?;

    log::info!(
        "Uploading {} copies of {} to '{}'",
        config.setup.upload_count,
        file_name,
        config.setup.bucket
    );

    let bar = progress_bar(config.setup.upload_count as u64);
    for _ in 0..config.setup.upload_count {
        let key = format!("{}/{}", random_hex(config.setup.prefix_bytes), file_name);
        s3.upload_file(track_file, &config.setup.bucket, &key).await?;
        bar.inc(1);
    }
    bar.finish();

    Ok(())
}
