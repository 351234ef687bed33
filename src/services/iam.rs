//! IAM operations.

use aws_config::SdkConfig;
use aws_sdk_iam::Client;
use serde_json::json;

use crate::error::{AppError, Result};

/// Client wrapper for execution role provisioning.
pub struct IamService {
    client: Client,
}

impl IamService {
    /// Create the service from the shared SDK configuration.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Create an execution role the Lambda service can assume.
    ///
    /// Returns the new role's ARN.
    pub async fn create_lambda_role(&self, role_name: &str) -> Result<String> {
        let response = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(lambda_trust_policy().to_string())
            .send()
            .await
            .map_err(AppError::iam)?;

        let arn = response
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| AppError::Iam("create_role response carried no role".to_string()))?;

        log::info!("Created role '{}' ({})", role_name, arn);
        Ok(arn)
    }
}

/// Trust policy allowing the Lambda service to assume the role.
fn lambda_trust_policy() -> serde_json::Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "lambda.amazonaws.com" },
            "Action": "sts:AssumeRole"
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_policy_names_the_lambda_service() {
        let policy = lambda_trust_policy();
        assert_eq!(policy["Version"], "2012-10-17");
        assert_eq!(
            policy["Statement"][0]["Principal"]["Service"],
            "lambda.amazonaws.com"
        );
        assert_eq!(policy["Statement"][0]["Action"], "sts:AssumeRole");
    }
}
