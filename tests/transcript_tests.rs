// Integration tests for transcript normalization
//
// These tests pin the decode behavior against each known server response
// variant: raw strings, JSON-encoded strings, segment arrays, labeled
// objects, and nested envelopes.

use meeting_scribe::{classify, extract_transcript, TranscriptPayload};
use serde_json::{json, Value};

#[test]
fn plain_text_passes_through() {
    let value = json!("hello from the meeting");
    assert_eq!(
        extract_transcript(&value),
        Some("hello from the meeting".to_string())
    );
}

#[test]
fn normalization_is_idempotent() {
    // A JSON-encoded object arriving as a string decodes to its text...
    let raw = Value::String(r#"{"text":"weekly planning sync"}"#.to_string());
    let first = extract_transcript(&raw).unwrap();
    assert_eq!(first, "weekly planning sync");

    // ...and normalizing the normalized text returns it unchanged.
    let second = extract_transcript(&Value::String(first.clone())).unwrap();
    assert_eq!(second, first);
}

#[test]
fn double_encoded_strings_unwrap_fully() {
    let raw = Value::String(r#""just a quoted transcript""#.to_string());
    assert_eq!(
        extract_transcript(&raw),
        Some("just a quoted transcript".to_string())
    );
}

#[test]
fn segment_array_joins_text_fields_in_order() {
    let value = json!([
        { "text": "first" },
        { "text": "second" },
        { "text": "third" }
    ]);
    assert_eq!(
        extract_transcript(&value),
        Some("first second third".to_string())
    );
}

#[test]
fn segment_array_accepts_mixed_field_names() {
    let value = json!([
        { "onebest": "a" },
        { "asr_text": "b" },
        { "transcript": "c" },
        { "text": "d" }
    ]);
    assert_eq!(extract_transcript(&value), Some("a b c d".to_string()));
}

#[test]
fn segments_without_text_are_skipped() {
    let value = json!([
        null,
        { "confidence": 0.9 },
        { "text": "kept" },
        {}
    ]);
    assert_eq!(extract_transcript(&value), Some("kept".to_string()));
}

#[test]
fn all_empty_segments_normalize_to_absence() {
    let value = json!([null, {}, { "confidence": 0.1 }]);
    assert_eq!(extract_transcript(&value), None);
}

#[test]
fn nested_data_extraction_matches_direct_extraction() {
    let inner_shapes = vec![
        json!("raw text"),
        json!([{ "text": "one" }, { "text": "two" }]),
        json!({ "onebest": "best path" }),
        json!({ "segments": [{ "asr_text": "deep" }] }),
        json!(42),
    ];

    for inner in inner_shapes {
        let wrapped = json!({ "data": inner });
        assert_eq!(
            extract_transcript(&wrapped),
            extract_transcript(&inner),
            "envelope must be transparent for {}",
            inner
        );
    }
}

#[test]
fn deeply_nested_envelopes_unwrap() {
    let value = json!({ "data": { "data": { "segments": [{ "text": "core" }] } } });
    assert_eq!(extract_transcript(&value), Some("core".to_string()));
}

#[test]
fn labeled_object_prefers_onebest() {
    let value = json!({
        "text": "generic",
        "onebest": "preferred",
        "asr_text": "secondary"
    });
    assert_eq!(extract_transcript(&value), Some("preferred".to_string()));
}

#[test]
fn unrecognized_shapes_yield_absence() {
    assert_eq!(extract_transcript(&json!(null)), None);
    assert_eq!(extract_transcript(&json!(true)), None);
    assert_eq!(extract_transcript(&json!({ "status": "pending" })), None);
}

#[test]
fn classification_covers_each_variant() {
    assert!(matches!(classify(&json!("x")), TranscriptPayload::Text(_)));
    assert!(matches!(
        classify(&json!([{ "text": "x" }])),
        TranscriptPayload::Segments(_)
    ));
    assert!(matches!(
        classify(&json!({ "text": "x" })),
        TranscriptPayload::Labeled(_)
    ));
    assert!(matches!(
        classify(&json!({ "data": "x" })),
        TranscriptPayload::Nested(_)
    ));
    assert!(matches!(classify(&json!(7)), TranscriptPayload::Unrecognized));
}
