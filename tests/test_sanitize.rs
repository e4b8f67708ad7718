//! Tests for [`career_progress::sanitize`]

use career_progress::error::CareerError;
use career_progress::sanitize::{sanitize, sanitize_into};
use serde::Deserialize;
use serde_json::json;

/// A fenced answer with a trailing comma recovers the object.
#[test]
fn test_fenced_block_with_trailing_comma() {
    let raw = "Here you go:\n```json\n{\"a\":1,}\n```";
    assert_eq!(sanitize(raw).unwrap(), json!({"a": 1}));
}

/// Valid JSON of any shape comes back unchanged.
#[test]
fn test_valid_json_round_trips() {
    let values = vec![
        json!({"name": "x, y: z", "nested": {"list": [1, 2.5, null, true]}}),
        json!([{"a": "// not a comment"}, {"b": "/* nor this */"}]),
        json!("just a string"),
        json!(42),
        json!(null),
        json!({"emoji": "🔥", "quote": "say \"hi\""}),
    ];
    for v in values {
        let text = serde_json::to_string(&v).unwrap();
        assert_eq!(sanitize(&text).unwrap(), v, "round trip failed for {}", text);
    }
}

/// Comment, unquoted key and trailing comma are all repaired in one pass.
#[test]
fn test_combined_repairs_in_one_pass() {
    let raw = "{\n  title: \"Roadmap\", // model note\n  \"stages\": [1, 2,],\n}";
    assert_eq!(sanitize(raw).unwrap(), json!({"title": "Roadmap", "stages": [1, 2]}));
}

#[test]
fn test_single_quoted_values() {
    let raw = "{\"level\": 'beginner', \"note\": 'say \"hi\"'}";
    assert_eq!(sanitize(raw).unwrap(), json!({"level": "beginner", "note": "say \"hi\""}));
}

/// Commas, colons and quotes inside string values are left as written.
#[test]
fn test_punctuation_inside_strings_survives_repair() {
    let raw = r#"{"tip": "Review notes, then: practice",}"#;
    assert_eq!(sanitize(raw).unwrap(), json!({"tip": "Review notes, then: practice"}));

    let raw = r#"{"tip": "Say: 'focus' daily", }"#;
    assert_eq!(sanitize(raw).unwrap(), json!({"tip": "Say: 'focus' daily"}));

    let raw = "```json\n{\"steps\": [\"a, b\", \"{c: d}\",], // done\n}\n```";
    assert_eq!(sanitize(raw).unwrap(), json!({"steps": ["a, b", "{c: d}"]}));
}

#[test]
fn test_single_quoted_keys() {
    let raw = r#"{'level': 'beginner', note: 'it\'s fine'}"#;
    assert_eq!(sanitize(raw).unwrap(), json!({"level": "beginner", "note": "it's fine"}));
}

/// Prose around the payload is ignored; the earliest opener wins.
#[test]
fn test_prose_around_array() {
    let raw = "Sure! Here are the questions: [{\"id\": \"q1\"}] Hope this helps.";
    assert_eq!(sanitize(raw).unwrap(), json!([{"id": "q1"}]));
}

#[test]
fn test_no_json_is_malformed() {
    let err = sanitize("I cannot help with that.").unwrap_err();
    assert!(matches!(err, CareerError::MalformedResponse(_)));
}

#[test]
fn test_unrecoverable_is_malformed() {
    let err = sanitize("{\"a\": [1, 2}").unwrap_err();
    assert!(matches!(err, CareerError::MalformedResponse(_)));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Shape {
    score: u32,
}

#[test]
fn test_sanitize_into_typed() {
    let s: Shape = sanitize_into("```\n{score: 80,}\n```").unwrap();
    assert_eq!(s, Shape { score: 80 });
}

/// Well-formed JSON with the wrong shape is still malformed for the caller.
#[test]
fn test_sanitize_into_shape_mismatch() {
    let err = sanitize_into::<Shape>("{\"points\": 3}").unwrap_err();
    assert!(matches!(err, CareerError::MalformedResponse(_)));
}
