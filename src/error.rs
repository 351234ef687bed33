// src/error.rs

//! Unified error handling for the gpxsync application.

use aws_sdk_s3::error::DisplayErrorContext;
use thiserror::Error;

/// Result type alias for gpxsync operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// AWS S3 error
    #[error("S3 error: {0}")]
    S3(String),

    /// AWS CloudWatch Logs error
    #[error("CloudWatch Logs error: {0}")]
    Logs(String),

    /// AWS IAM error
    #[error("IAM error: {0}")]
    Iam(String),

    /// AWS Lambda error
    #[error("Lambda error: {0}")]
    Lambda(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an S3 error from an SDK error, keeping the full error chain.
    pub fn s3(err: impl std::error::Error) -> Self {
        Self::S3(DisplayErrorContext(err).to_string())
    }

    /// Create a CloudWatch Logs error from an SDK error.
    pub fn logs(err: impl std::error::Error) -> Self {
        Self::Logs(DisplayErrorContext(err).to_string())
    }

    /// Create an IAM error from an SDK error.
    pub fn iam(err: impl std::error::Error) -> Self {
        Self::Iam(DisplayErrorContext(err).to_string())
    }

    /// Create a Lambda error from an SDK error.
    pub fn lambda(err: impl std::error::Error) -> Self {
        Self::Lambda(DisplayErrorContext(err).to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
