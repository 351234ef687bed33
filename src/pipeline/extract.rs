//! Object reference extraction from raw log records.
//!
//! The notification function echoes S3 event documents into its log stream
//! as JSON embedded in plain-text messages. This module filters one fetched
//! page of records and pulls out the object references those documents
//! describe. It holds no state; every call is independent.

use serde_json::Value;
use thiserror::Error;

use crate::models::{LogRecord, ObjectRef, S3Record};

/// Escape artifact left in object keys when the upstream notification
/// system URL-encodes Windows-style path separators.
const ESCAPED_BACKSLASH: &str = "%5C";

/// Why a filter-matched message, or one of its records, was skipped.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The message matched the filter but carries no parseable JSON document.
    #[error("malformed notification payload: {detail}")]
    MalformedPayload { detail: String },

    /// A `Records` element lacks one of the required fields.
    #[error("notification record {index} is unusable: {detail}")]
    MissingField { index: usize, detail: String },
}

/// Outcome of one extraction pass over a page of log records.
///
/// Skipped items are counted rather than returned; extraction is
/// best-effort over the batch and one corrupt entry never sinks it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// Extracted references, in encounter order
    pub refs: Vec<ObjectRef>,

    /// Filter-matched messages whose payload failed to parse
    pub malformed_payloads: usize,

    /// `Records` elements dropped for missing or empty fields
    pub missing_fields: usize,
}

/// Extract object references from a page of log records.
///
/// A record contributes nothing unless its message is non-empty and
/// contains `filter`. Relative input order is preserved, and so is the
/// order of `Records` elements within one message. No deduplication: a key
/// seen in several messages is emitted once per sighting.
pub fn extract_object_refs(records: &[LogRecord], filter: &str) -> ExtractOutcome {
    let mut outcome = ExtractOutcome::default();

    for record in records {
        if record.message.is_empty() || !record.message.contains(filter) {
            continue;
        }

        let payload = match parse_payload(&record.message) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!("Skipping log record: {}", err);
                outcome.malformed_payloads += 1;
                continue;
            }
        };

        let Some(event_records) = payload.get("Records").and_then(Value::as_array) else {
            continue;
        };

        for (index, element) in event_records.iter().enumerate() {
            match object_ref_from_element(index, element) {
                Ok(object_ref) => outcome.refs.push(object_ref),
                Err(err) => {
                    log::warn!("Skipping notification record: {}", err);
                    outcome.missing_fields += 1;
                }
            }
        }
    }

    outcome
}

/// Parse the JSON document embedded in a log message.
///
/// Messages carry a plain-text prefix (level, banner text) ahead of the
/// document, so parsing starts at the first `{`. Trailing text after the
/// document is tolerated.
fn parse_payload(message: &str) -> Result<Value, ExtractError> {
    let start = message
        .find('{')
        .ok_or_else(|| ExtractError::MalformedPayload {
            detail: "no JSON object in message".to_string(),
        })?;

    let mut stream = serde_json::Deserializer::from_str(&message[start..]).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(err)) => Err(ExtractError::MalformedPayload {
            detail: err.to_string(),
        }),
        None => Err(ExtractError::MalformedPayload {
            detail: "empty JSON document".to_string(),
        }),
    }
}

/// Convert one `Records` element into an [`ObjectRef`].
fn object_ref_from_element(index: usize, element: &Value) -> Result<ObjectRef, ExtractError> {
    let record: S3Record =
        serde_json::from_value(element.clone()).map_err(|err| ExtractError::MissingField {
            index,
            detail: err.to_string(),
        })?;

    if record.s3.bucket.name.is_empty() {
        return Err(ExtractError::MissingField {
            index,
            detail: "empty bucket name".to_string(),
        });
    }
    if record.s3.object.key.is_empty() {
        return Err(ExtractError::MissingField {
            index,
            detail: "empty object key".to_string(),
        });
    }

    Ok(ObjectRef {
        bucket: record.s3.bucket.name,
        key: normalize_key(&record.s3.object.key),
        event_timestamp: record.event_time,
    })
}

/// Replace `%5C` escape artifacts with literal backslashes.
fn normalize_key(key: &str) -> String {
    key.replace(ESCAPED_BACKSLASH, "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILTER: &str = "route_framed_synced.gpx";

    fn record(message: &str) -> LogRecord {
        LogRecord {
            timestamp: None,
            message: message.to_string(),
        }
    }

    fn event_message(keys: &[&str]) -> String {
        let records: Vec<String> = keys
            .iter()
            .map(|key| {
                format!(
                    r#"{{"s3":{{"bucket":{{"name":"b1"}},"object":{{"key":"{key}"}}}},"eventTime":"2024-01-01T00:00:00Z"}}"#
                )
            })
            .collect();
        format!(
            r#"INFO Received event: {{"Records":[{}]}}"#,
            records.join(",")
        )
    }

    #[test]
    fn empty_and_unrelated_messages_emit_nothing() {
        let records = vec![
            record(""),
            record("starting upload batch"),
            record("no notification here"),
        ];
        let outcome = extract_object_refs(&records, FILTER);
        assert!(outcome.refs.is_empty());
        assert_eq!(outcome.malformed_payloads, 0);
        assert_eq!(outcome.missing_fields, 0);
    }

    #[test]
    fn worked_example_extracts_normalized_ref() {
        let message = concat!(
            "uploading route_framed_synced.gpx ... ",
            r#"{"Records":[{"s3":{"bucket":{"name":"b1"},"object":{"key":"a%5Cb.gpx"}},"eventTime":"2024-01-01T00:00:00Z"}]}"#
        );
        let outcome = extract_object_refs(&[record(message)], FILTER);

        assert_eq!(
            outcome.refs,
            vec![ObjectRef {
                bucket: "b1".to_string(),
                key: "a\\b.gpx".to_string(),
                event_timestamp: "2024-01-01T00:00:00Z".to_string(),
            }]
        );
    }

    #[test]
    fn two_records_emit_in_array_order() {
        let message = event_message(&["first/route_framed_synced.gpx", "second/route_framed_synced.gpx"]);
        let outcome = extract_object_refs(&[record(&message)], FILTER);

        let keys: Vec<&str> = outcome.refs.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["first/route_framed_synced.gpx", "second/route_framed_synced.gpx"]
        );
    }

    #[test]
    fn order_is_preserved_across_messages() {
        let records = vec![
            record(&event_message(&["a/route_framed_synced.gpx"])),
            record("unrelated chatter"),
            record(&event_message(&["b/route_framed_synced.gpx", "c/route_framed_synced.gpx"])),
        ];
        let outcome = extract_object_refs(&records, FILTER);

        let keys: Vec<&str> = outcome.refs.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "a/route_framed_synced.gpx",
                "b/route_framed_synced.gpx",
                "c/route_framed_synced.gpx"
            ]
        );
    }

    #[test]
    fn key_without_escape_is_unchanged() {
        assert_eq!(normalize_key("plain/key.gpx"), "plain/key.gpx");
        assert_eq!(normalize_key("a%5Cb.gpx"), "a\\b.gpx");
        assert_eq!(normalize_key("%5C%5C"), "\\\\");
    }

    #[test]
    fn malformed_payload_does_not_sink_the_batch() {
        let records = vec![
            record(&event_message(&["one/route_framed_synced.gpx"])),
            record("route_framed_synced.gpx { this is not json"),
            record(&event_message(&["two/route_framed_synced.gpx"])),
        ];
        let outcome = extract_object_refs(&records, FILTER);

        assert_eq!(outcome.refs.len(), 2);
        assert_eq!(outcome.malformed_payloads, 1);
    }

    #[test]
    fn filter_match_without_json_counts_malformed() {
        let records = vec![record("uploaded route_framed_synced.gpx successfully")];
        let outcome = extract_object_refs(&records, FILTER);

        assert!(outcome.refs.is_empty());
        assert_eq!(outcome.malformed_payloads, 1);
    }

    #[test]
    fn missing_field_drops_only_that_element() {
        let message = concat!(
            "Received event route_framed_synced.gpx: ",
            r#"{"Records":["#,
            r#"{"s3":{"bucket":{"name":"b1"},"object":{"key":"good.gpx"}},"eventTime":"2024-01-01T00:00:00Z"},"#,
            r#"{"s3":{"bucket":{"name":"b1"},"object":{"key":"no-time.gpx"}}},"#,
            r#"{"s3":{"bucket":{"name":""},"object":{"key":"empty-bucket.gpx"}},"eventTime":"2024-01-01T00:00:00Z"}"#,
            r#"]}"#
        );
        let outcome = extract_object_refs(&[record(message)], FILTER);

        assert_eq!(outcome.refs.len(), 1);
        assert_eq!(outcome.refs[0].key, "good.gpx");
        assert_eq!(outcome.missing_fields, 2);
    }

    #[test]
    fn payload_without_records_array_emits_nothing() {
        let records = vec![
            record(r#"route_framed_synced.gpx {"Service":"Amazon S3","Event":"s3:TestEvent"}"#),
            record(r#"route_framed_synced.gpx {"Records":[]}"#),
        ];
        let outcome = extract_object_refs(&records, FILTER);

        assert!(outcome.refs.is_empty());
        assert_eq!(outcome.malformed_payloads, 0);
        assert_eq!(outcome.missing_fields, 0);
    }

    #[test]
    fn trailing_text_after_payload_is_tolerated() {
        let message = format!("{} END RequestId: 1234", event_message(&["x/route_framed_synced.gpx"]));
        let outcome = extract_object_refs(&[record(&message)], FILTER);
        assert_eq!(outcome.refs.len(), 1);
    }

    #[test]
    fn duplicate_keys_are_kept() {
        let records = vec![
            record(&event_message(&["dup/route_framed_synced.gpx"])),
            record(&event_message(&["dup/route_framed_synced.gpx"])),
        ];
        let outcome = extract_object_refs(&records, FILTER);
        assert_eq!(outcome.refs.len(), 2);
        assert_eq!(outcome.refs[0], outcome.refs[1]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let records = vec![
            record(&event_message(&["a/route_framed_synced.gpx"])),
            record("route_framed_synced.gpx { broken"),
        ];
        let first = extract_object_refs(&records, FILTER);
        let second = extract_object_refs(&records, FILTER);
        assert_eq!(first, second);
    }
}
