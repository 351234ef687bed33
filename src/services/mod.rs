//! Thin clients over the AWS services the demo stack is built from.
//!
//! Every operation forwards to the official SDK; the only logic kept here
//! is endpoint and credential wiring plus error conversion.

pub mod iam;
pub mod lambda;
pub mod logs;
pub mod s3;

use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::models::AwsConfig;

pub use iam::IamService;
pub use lambda::LambdaService;
pub use logs::{FetchDirection, LogsService, StreamInfo};
pub use s3::S3Service;

/// Build the shared SDK configuration from explicit settings.
///
/// Credentials, endpoint, and region always come from [`AwsConfig`], never
/// from ambient provider chains, so the tool talks to LocalStack by default
/// and to real AWS only when configured to.
pub async fn load_sdk_config(aws: &AwsConfig) -> SdkConfig {
    let credentials = aws_sdk_s3::config::Credentials::new(
        aws.access_key_id.as_str(),
        aws.secret_access_key.as_str(),
        None,
        None,
        "gpxsync",
    );

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(aws.region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(aws.endpoint_url.as_str())
        .load()
        .await
}
