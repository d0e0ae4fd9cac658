//! Transcript payload normalization.
//!
//! The service returns transcripts in several shapes: a raw string
//! (sometimes double-encoded JSON), an array of segment objects, a
//! labeled object, or an envelope nesting one of those under `data` or
//! `segments`. Classification is an explicit tagged union with a fixed
//! decode order; anything unrecognizable normalizes to absence, never to
//! an error.

use serde_json::Value;

/// Field names that may carry transcript text, probed in this order.
const TEXT_FIELDS: [&str; 4] = ["onebest", "asr_text", "transcript", "text"];

/// Recognized transcript payload shapes, in decode order.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptPayload {
    /// Plain text, possibly JSON-encoded one level deeper.
    Text(String),
    /// Array of segments; each contributes its first known text field.
    Segments(Vec<String>),
    /// Object with a known text field at the top level.
    Labeled(String),
    /// Object embedding the real payload under `data` or `segments`.
    Nested(Value),
    Unrecognized,
}

/// Classify one payload value. Only looks one level deep; recursion
/// happens in [`extract_transcript`].
pub fn classify(value: &Value) -> TranscriptPayload {
    match value {
        Value::String(s) => TranscriptPayload::Text(s.clone()),
        Value::Array(items) => {
            TranscriptPayload::Segments(items.iter().filter_map(segment_text).collect())
        }
        Value::Object(map) => {
            if let Some(text) = TEXT_FIELDS.iter().find_map(|f| map.get(*f).and_then(field_text)) {
                return TranscriptPayload::Labeled(text);
            }
            if let Some(inner) = map.get("data").filter(|v| !v.is_null()) {
                return TranscriptPayload::Nested(inner.clone());
            }
            if let Some(inner) = map.get("segments").filter(|v| !v.is_null()) {
                return TranscriptPayload::Nested(inner.clone());
            }
            TranscriptPayload::Unrecognized
        }
        _ => TranscriptPayload::Unrecognized,
    }
}

/// Normalize a raw transcript payload into plain text.
///
/// Normalization is idempotent: feeding the result back in returns the
/// same text, because plain transcript text does not parse as JSON.
pub fn extract_transcript(value: &Value) -> Option<String> {
    match classify(value) {
        TranscriptPayload::Text(s) => match serde_json::from_str::<Value>(&s) {
            Ok(inner) => extract_transcript(&inner),
            Err(_) => Some(s),
        },
        TranscriptPayload::Segments(parts) => {
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        TranscriptPayload::Labeled(text) => Some(text),
        TranscriptPayload::Nested(inner) => extract_transcript(&inner),
        TranscriptPayload::Unrecognized => None,
    }
}

/// Text carried by one array segment, if any.
fn segment_text(segment: &Value) -> Option<String> {
    let map = segment.as_object()?;
    TEXT_FIELDS.iter().find_map(|f| map.get(*f).and_then(field_text))
}

/// A usable text field value: a non-empty string, or a number rendered
/// as text. Empty strings and other types carry no transcript.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
