//! Common types used throughout jobfeed-etl
//!
//! Shared type aliases, small enums read from configuration,
//! and string helpers used by the transform.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Log Level
// ============================================================================

/// Log level for the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Parquet Compression
// ============================================================================

/// Compression codec for written Parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    /// Snappy (the default of most Parquet writers)
    #[default]
    Snappy,
    /// Zstandard at the default level
    Zstd,
    /// Gzip at the default level
    Gzip,
    /// No compression
    None,
}

impl From<CompressionCodec> for parquet::basic::Compression {
    fn from(codec: CompressionCodec) -> Self {
        match codec {
            CompressionCodec::Snappy => parquet::basic::Compression::SNAPPY,
            CompressionCodec::Zstd => {
                parquet::basic::Compression::ZSTD(parquet::basic::ZstdLevel::default())
            }
            CompressionCodec::Gzip => {
                parquet::basic::Compression::GZIP(parquet::basic::GzipLevel::default())
            }
            CompressionCodec::None => parquet::basic::Compression::UNCOMPRESSED,
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Trim a string slice, returning None when nothing is left
pub fn trimmed_non_empty(s: &str) -> Option<String> {
    s.trim().to_string().none_if_empty()
}
