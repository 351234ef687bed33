//! S3 bucket and object operations.

use std::path::Path;

use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Event, LambdaFunctionConfiguration,
    NotificationConfiguration,
};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Id under which the bucket's Lambda notification is registered.
const NOTIFICATION_ID: &str = "gpx-object-created";

/// Client wrapper for bucket and object operations.
pub struct S3Service {
    client: Client,
    region: String,
}

impl S3Service {
    /// Create the service from the shared SDK configuration.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        // Path-style addressing keeps bucket URLs resolvable on LocalStack.
        let config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(config),
            region: sdk_config
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_default(),
        }
    }

    /// Create a bucket in the configured region.
    pub async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(bucket);

        if let Some(constraint) = location_constraint(&self.region) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        request.send().await.map_err(AppError::s3)?;
        log::info!("Created bucket '{}'", bucket);
        Ok(())
    }

    /// List all bucket names in the account.
    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(AppError::s3)?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    /// Upload a local file to `bucket` under `key`.
    pub async fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> Result<()> {
        let body = ByteStream::from_path(path).await.map_err(AppError::s3)?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(AppError::s3)?;

        log::debug!("Uploaded {} to s3://{}/{}", path.display(), bucket, key);
        Ok(())
    }

    /// List object keys in a bucket.
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(AppError::s3)?;

        Ok(response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect())
    }

    /// Download `s3://bucket/key` to `dest`, creating parent directories.
    pub async fn download_file(&self, bucket: &str, key: &str, dest: &Path) -> Result<()> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(AppError::s3)?;

        let bytes = response.body.collect().await.map_err(AppError::s3)?.into_bytes();
        write_atomic(dest, &bytes).await?;

        log::debug!("Downloaded s3://{}/{} to {}", bucket, key, dest.display());
        Ok(())
    }

    /// Route `s3:ObjectCreated:*` events on `bucket` to a Lambda function.
    pub async fn configure_lambda_notification(
        &self,
        bucket: &str,
        function_arn: &str,
    ) -> Result<()> {
        let lambda_config = LambdaFunctionConfiguration::builder()
            .id(NOTIFICATION_ID)
            .lambda_function_arn(function_arn)
            .events(Event::from("s3:ObjectCreated:*"))
            .build()
            .map_err(AppError::s3)?;

        let notification = NotificationConfiguration::builder()
            .lambda_function_configurations(lambda_config)
            .build();

        self.client
            .put_bucket_notification_configuration()
            .bucket(bucket)
            .notification_configuration(notification)
            .send()
            .await
            .map_err(AppError::s3)?;

        log::info!("Bucket '{}' now notifies {}", bucket, function_arn);
        Ok(())
    }
}

/// Location constraint for a region, or `None` for the default region.
///
/// us-east-1 is the one region that must not send a constraint.
fn location_constraint(region: &str) -> Option<BucketLocationConstraint> {
    if region.is_empty() || region == "us-east-1" {
        None
    } else {
        Some(BucketLocationConstraint::from(region))
    }
}

/// Write bytes atomically (write to temp, then rename), creating any
/// missing parent directories first.
async fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, dest).await?;
    Ok(())
}
