//! Tests for decoder module

use super::*;

// ============================================================================
// DecoderFormat Tests
// ============================================================================

#[test]
fn test_decoder_format_default() {
    assert_eq!(DecoderFormat::default(), DecoderFormat::Auto);
}

#[test]
fn test_decoder_format_serde() {
    let format: DecoderFormat = serde_yaml::from_str("jsonl").unwrap();
    assert_eq!(format, DecoderFormat::Jsonl);

    let json = serde_json::to_string(&DecoderFormat::Json).unwrap();
    assert_eq!(json, "\"json\"");
}

#[test]
fn test_build_decoder_matches_format() {
    for format in [DecoderFormat::Auto, DecoderFormat::Json, DecoderFormat::Jsonl] {
        assert_eq!(build_decoder(format).format(), format);
    }
}

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_object() {
    let decoder = JsonDecoder::new();
    let body = r#"{"count": 2, "items": [{"id": "1"}, {"id": "2"}]}"#;

    let containers = decoder.decode(body).unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0]["items"][1]["id"], "2");
}

#[test]
fn test_json_decoder_array_of_containers() {
    let decoder = JsonDecoder::new();
    let body = r#"[{"items": []}, {"items": [{"id": "1"}]}]"#;

    let containers = decoder.decode(body).unwrap();
    assert_eq!(containers.len(), 2);
}

#[test]
fn test_json_decoder_pretty_printed() {
    let decoder = JsonDecoder::new();
    let body = "{\n  \"items\": [\n    {\"id\": \"1\"}\n  ]\n}\n";

    let containers = decoder.decode(body).unwrap();
    assert_eq!(containers.len(), 1);
}

#[test]
fn test_json_decoder_invalid() {
    let decoder = JsonDecoder::new();
    let err = decoder.decode("not valid json").unwrap_err();
    assert!(err.is_input_error());
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_decoder_basic() {
    let decoder = JsonlDecoder::new();
    let body = r#"{"items": [{"id": "1"}]}
{"items": [{"id": "2"}]}
{"items": []}"#;

    let containers = decoder.decode(body).unwrap();
    assert_eq!(containers.len(), 3);
    assert_eq!(containers[1]["items"][0]["id"], "2");
}

#[test]
fn test_jsonl_decoder_empty_lines() {
    let decoder = JsonlDecoder::new();
    let body = r#"{"items": []}

{"items": []}
"#;

    let containers = decoder.decode(body).unwrap();
    assert_eq!(containers.len(), 2);
}

#[test]
fn test_jsonl_decoder_invalid_line() {
    let decoder = JsonlDecoder::new();
    let body = r#"{"items": []}
not valid json
{"items": []}"#;

    let err = decoder.decode(body).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

// ============================================================================
// Auto Decoder Tests
// ============================================================================

#[test]
fn test_auto_decoder_single_document() {
    let decoder = AutoDecoder::new();
    let body = "{\n  \"items\": [{\"id\": \"1\"}]\n}";

    let containers = decoder.decode(body).unwrap();
    assert_eq!(containers.len(), 1);
}

#[test]
fn test_auto_decoder_falls_back_to_lines() {
    let decoder = AutoDecoder::new();
    let body = "{\"items\": []}\n{\"items\": []}\n";

    let containers = decoder.decode(body).unwrap();
    assert_eq!(containers.len(), 2);
}

#[test]
fn test_auto_decoder_empty_body() {
    let decoder = AutoDecoder::new();
    assert!(decoder.decode("  \n").unwrap().is_empty());
}

#[test]
fn test_auto_decoder_garbage() {
    let decoder = AutoDecoder::new();
    assert!(decoder.decode("{{{").is_err());
}
