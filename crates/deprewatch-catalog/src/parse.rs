//! Structured-record parsing of inference responses
//!
//! The inference capability answers with free-form text that should contain
//! one fenced ```json block holding an array of record objects. Parsing is
//! fail-open: the public entry point never propagates an error, it returns
//! an empty sequence meaning "no deprecations known".

use deprewatch_core::DeprecationRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Errors from the fallible parsing path
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("response contains no fenced json block")]
    NoStructuredBlock,

    #[error("fenced block does not hold a record array: {0}")]
    MalformedRecords(String),
}

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)```").expect("fence pattern compiles"));

/// Parse an inference response into records, degrading to empty on failure.
pub fn parse_records(response: &str) -> Vec<DeprecationRecord> {
    match try_parse_records(response) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("unusable inference response: {e}");
            Vec::new()
        }
    }
}

/// Fallible parsing path.
///
/// Finds the first fenced ```json block with a single non-greedy scan, then
/// parses its contents as a JSON array. Elements are validated
/// individually: non-objects and entries without a non-empty `apiName` are
/// dropped while valid siblings are kept; missing `changeType` or
/// `description` default to the empty string.
pub fn try_parse_records(response: &str) -> Result<Vec<DeprecationRecord>, ParseError> {
    let caps = JSON_BLOCK
        .captures(response)
        .ok_or(ParseError::NoStructuredBlock)?;
    let block = caps
        .get(1)
        .map(|m| m.as_str())
        .ok_or(ParseError::NoStructuredBlock)?;

    let value: Value = serde_json::from_str(block.trim())
        .map_err(|e| ParseError::MalformedRecords(e.to_string()))?;

    let items = value
        .as_array()
        .ok_or_else(|| ParseError::MalformedRecords("top-level value is not an array".to_string()))?;

    let records: Vec<DeprecationRecord> = items.iter().filter_map(record_from_value).collect();

    if records.len() < items.len() {
        tracing::warn!(
            dropped = items.len() - records.len(),
            "dropped malformed record elements"
        );
    }

    Ok(records)
}

/// Validate one array element; `None` drops it
fn record_from_value(value: &Value) -> Option<DeprecationRecord> {
    let obj = value.as_object()?;

    let api_name = obj.get("apiName")?.as_str()?.trim();
    if api_name.is_empty() {
        return None;
    }

    Some(DeprecationRecord {
        api_name: api_name.to_string(),
        change_type: string_field(obj, "changeType"),
        description: string_field(obj, "description"),
    })
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
