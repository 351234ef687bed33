//! gpxsync notification function.
//!
//! Deployed behind the bucket's object-created notification. Its single job
//! is to echo each received S3 event into its CloudWatch log stream, where
//! `gpxsync download` later scrapes it back out. The event is logged raw,
//! not wrapped in a structured envelope, because the scraper parses the
//! JSON straight out of the message line.

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde_json::{Value, json};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    info!("gpxsync notification echo starting...");

    lambda_runtime::run(service_fn(handler)).await
}

/// Echo the received event into the log stream and acknowledge it.
async fn handler(event: LambdaEvent<Value>) -> Result<Value, LambdaError> {
    let response = echo_response(&event.payload)?;
    Ok(response)
}

/// Log the payload and build the acknowledgement body.
fn echo_response(payload: &Value) -> Result<Value, LambdaError> {
    let body = serde_json::to_string(payload)?;
    info!("Received event: {}", body);

    Ok(json!({
        "statusCode": 200,
        "body": body,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_acknowledges_with_the_event_body() {
        let payload = json!({ "Records": [{ "eventTime": "2024-01-01T00:00:00Z" }] });
        let response = echo_response(&payload).unwrap();

        assert_eq!(response["statusCode"], 200);
        let body = response["body"].as_str().unwrap();
        assert!(body.contains("2024-01-01T00:00:00Z"));

        // The body must round-trip as JSON for the scraper to parse it.
        let reparsed: Value = serde_json::from_str(body).unwrap();
        assert_eq!(reparsed, payload);
    }
}
