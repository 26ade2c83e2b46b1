//! Normalization of raw resolver output into [`VideoMetadata`]
//!
//! The resolver emits one loosely-typed JSON object. Each field is projected
//! independently: a missing or mistyped field falls back to its sentinel and
//! never affects the others. Only a document that is not a JSON object fails.

use serde_json::{Map, Value};

use super::entity::{VideoLink, VideoMetadata};
use crate::domain::DomainError;

/// Parse raw resolver output and normalize it
pub fn normalize_metadata(raw: &[u8]) -> Result<VideoMetadata, DomainError> {
    let document: Value = serde_json::from_slice(raw)
        .map_err(|e| DomainError::malformed_metadata(format!("Invalid JSON: {}", e)))?;

    normalize_document(&document)
}

/// Normalize an already parsed resolver document
pub fn normalize_document(document: &Value) -> Result<VideoMetadata, DomainError> {
    let fields = document.as_object().ok_or_else(|| {
        DomainError::malformed_metadata(format!(
            "Expected a JSON object, got {}",
            value_kind(document)
        ))
    })?;

    Ok(project_fields(fields))
}

fn project_fields(fields: &Map<String, Value>) -> VideoMetadata {
    VideoMetadata {
        title: string_field(fields, "title")
            .unwrap_or(VideoMetadata::UNKNOWN_TITLE)
            .to_string(),
        thumbnail: string_field(fields, "thumbnail")
            .unwrap_or(VideoMetadata::NO_THUMBNAIL)
            .to_string(),
        duration_seconds: duration_field(fields).unwrap_or(0),
        category: first_category(fields)
            .unwrap_or(VideoMetadata::UNCATEGORIZED)
            .to_string(),
        links: stream_links(fields),
    }
}

fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

/// Whole seconds, truncated toward zero. Negative values count as absent.
fn duration_field(fields: &Map<String, Value>) -> Option<u64> {
    let Value::Number(number) = fields.get("duration")? else {
        return None;
    };

    if let Some(seconds) = number.as_u64() {
        return Some(seconds);
    }

    number
        .as_f64()
        .filter(|seconds| *seconds >= 0.0)
        .map(|seconds| seconds as u64)
}

fn first_category(fields: &Map<String, Value>) -> Option<&str> {
    fields
        .get("categories")?
        .as_array()?
        .first()?
        .as_str()
}

/// Formats carrying both a string `url` and a string `format`, in resolver order
fn stream_links(fields: &Map<String, Value>) -> Vec<VideoLink> {
    let Some(formats) = fields.get("formats").and_then(Value::as_array) else {
        return Vec::new();
    };

    formats
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|format| {
            let url = string_field(format, "url")?;
            let quality = string_field(format, "format")?;
            Some(VideoLink::new(url, quality))
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
