//! Records as returned by the query boundary, plus the small text helpers
//! shared by the projector and the canvas.

use serde_json::Value;
use std::io::Read;

use crate::error::{ExploreError, Result};

/// One result row: field name → value, in the order the query returned them.
pub type Record = serde_json::Map<String, Value>;

/// Marker (under `path_type`) that identifies a serialized path.
pub const PATH_MARKER: &str = "neo4j_path";

/// Ellipsis appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Characters kept from descriptions and stringified maps before truncation.
pub const TEXT_LIMIT: usize = 100;

/// Parse a JSON document holding an array of record objects.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value)
}

/// Read a whole document from `reader` (a file, stdin) and parse it.
pub fn read_records(mut reader: impl Read) -> Result<Vec<Record>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_records(&text)
}

pub fn records_from_value(value: Value) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(ExploreError::InvalidRecords(
            "expected a JSON array of records".to_string(),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(ExploreError::InvalidRecords(format!(
                "record {i} is not an object (found {})",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Human-facing text for a value: strings as-is, everything else as JSON.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cut `text` to `limit` characters, appending [`ELLIPSIS`] when anything was
/// dropped.
pub fn truncate_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// `true` for values a dictionary lookup would treat as "present and
/// non-empty" (used for optional description columns).
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
