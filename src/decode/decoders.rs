//! Decoder implementations
//!
//! Each decoder handles a specific file layout.

use super::types::{ContainerDecoder, DecoderFormat};
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// Whole-file JSON decoder
///
/// A top-level array yields one container per element, any other value is a
/// single container.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self
    }
}

impl ContainerDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;

        match value {
            Value::Array(arr) => Ok(arr),
            other => Ok(vec![other]),
        }
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Json
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one container per line)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl ContainerDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut containers = Vec::new();

        for (line_num, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| Error::Decode {
                message: format!("Failed to parse JSONL at line {}: {e}", line_num + 1),
            })?;

            containers.push(value);
        }

        Ok(containers)
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Jsonl
    }
}

// ============================================================================
// Auto Decoder
// ============================================================================

/// Decoder that accepts either layout
///
/// The body is first read as one JSON document. When that fails it is read as
/// JSON Lines, and the JSON Lines error is reported if both fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecoder;

impl AutoDecoder {
    /// Create a new auto-detecting decoder
    pub fn new() -> Self {
        Self
    }
}

impl ContainerDecoder for AutoDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        match JsonDecoder.decode(body) {
            Ok(containers) => Ok(containers),
            Err(_) => JsonlDecoder.decode(body),
        }
    }

    fn format(&self) -> DecoderFormat {
        DecoderFormat::Auto
    }
}
