//! Lambda function provisioning operations.

use std::path::Path;

use aws_config::SdkConfig;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{FunctionCode, Runtime};

use crate::error::{AppError, Result};

/// Statement id under which S3 is granted invoke permission.
const S3_TRIGGER_STATEMENT_ID: &str = "s3-trigger-permission";

/// Client wrapper for function provisioning.
pub struct LambdaService {
    client: Client,
}

impl LambdaService {
    /// Create the service from the shared SDK configuration.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Create a function from a prebuilt deployment zip.
    ///
    /// The zip must contain a `bootstrap` binary for the provided.al2023
    /// runtime; building it is a separate step. Returns the function ARN.
    pub async fn create_function(
        &self,
        function_name: &str,
        role_arn: &str,
        zip_path: &Path,
    ) -> Result<String> {
        let zip = tokio::fs::read(zip_path).await?;

        let code = FunctionCode::builder().zip_file(Blob::new(zip)).build();

        let response = self
            .client
            .create_function()
            .function_name(function_name)
            .role(role_arn)
            .runtime(Runtime::Providedal2023)
            .handler("bootstrap")
            .code(code)
            .send()
            .await
            .map_err(AppError::lambda)?;

        let arn = response
            .function_arn()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Lambda("create_function response carried no ARN".to_string())
            })?;

        log::info!("Created function '{}' ({})", function_name, arn);
        Ok(arn)
    }

    /// Allow object notifications from `bucket` to invoke the function.
    pub async fn allow_bucket_invocation(&self, function_name: &str, bucket: &str) -> Result<()> {
        self.client
            .add_permission()
            .function_name(function_name)
            .statement_id(S3_TRIGGER_STATEMENT_ID)
            .action("lambda:InvokeFunction")
            .principal("s3.amazonaws.com")
            .source_arn(bucket_arn(bucket))
            .send()
            .await
            .map_err(AppError::lambda)?;

        log::info!(
            "Granted s3.amazonaws.com invoke on '{}' for bucket '{}'",
            function_name,
            bucket
        );
        Ok(())
    }
}

/// ARN of a bucket, used to scope the invoke permission.
fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_arn_has_s3_prefix() {
        assert_eq!(
            bucket_arn("gpx-bucket-aws-test"),
            "arn:aws:s3:::gpx-bucket-aws-test"
        );
    }
}
