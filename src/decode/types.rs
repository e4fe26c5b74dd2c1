//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Layout of a source file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// Try a single JSON document, fall back to JSON Lines (default)
    #[default]
    Auto,
    /// One JSON document per file
    Json,
    /// JSON Lines (one container per line)
    Jsonl,
}

/// Trait for decoding a file body into containers
pub trait ContainerDecoder: Send + Sync {
    /// Decode the body into a list of containers
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Format this decoder handles
    fn format(&self) -> DecoderFormat;
}
