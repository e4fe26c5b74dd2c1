//! Pipeline configuration
//!
//! The configuration surface is small: where to read raw listings, where to
//! append the partitioned output, and how to encode it. It is loaded from
//! YAML and may be overridden from the command line.
//!
//! ```yaml
//! source:
//!   path: s3://adzuna-etl/raw_data/to_process/
//!   format: auto
//! destination:
//!   path: s3://adzuna-etl/transformed_data/
//!   compression: snappy
//! log_level: info
//! ```

use crate::decode::DecoderFormat;
use crate::error::{Error, Result};
use crate::output::ParquetWriterConfig;
use crate::types::{CompressionCodec, LogLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Top-Level Pipeline Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Where raw listing files are read from
    #[serde(default)]
    pub source: SourceConfig,

    /// Where partitioned Parquet files are appended
    #[serde(default)]
    pub destination: DestinationConfig,

    /// Default log level (RUST_LOG still wins)
    #[serde(default)]
    pub log_level: LogLevel,
}

impl PipelineConfig {
    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Check the config is complete enough to run
    pub fn validate(&self) -> Result<()> {
        if self.source.path.trim().is_empty() {
            return Err(Error::missing_config_field("source.path"));
        }

        if self.destination.path.trim().is_empty() {
            return Err(Error::missing_config_field("destination.path"));
        }

        if self.destination.row_group_size == 0 {
            return Err(Error::invalid_config(
                "destination.row_group_size",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Set the source path
    #[must_use]
    pub fn with_source(mut self, path: impl Into<String>) -> Self {
        self.source.path = path.into();
        self
    }

    /// Set the destination path
    #[must_use]
    pub fn with_destination(mut self, path: impl Into<String>) -> Self {
        self.destination.path = path.into();
        self
    }

    /// Set the input format
    #[must_use]
    pub fn with_format(mut self, format: DecoderFormat) -> Self {
        self.source.format = format;
        self
    }
}

// ============================================================================
// Source
// ============================================================================

/// Raw input settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source URL or local path
    #[serde(default)]
    pub path: String,

    /// File layout
    #[serde(default)]
    pub format: DecoderFormat,
}

// ============================================================================
// Destination
// ============================================================================

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination URL or local path
    #[serde(default)]
    pub path: String,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: CompressionCodec,

    /// Maximum rows per Parquet row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            compression: CompressionCodec::default(),
            row_group_size: default_row_group_size(),
        }
    }
}

impl DestinationConfig {
    /// Parquet writer settings for this destination
    pub fn writer_config(&self) -> ParquetWriterConfig {
        ParquetWriterConfig::new()
            .with_codec(self.compression)
            .with_row_group_size(self.row_group_size)
    }
}

fn default_row_group_size() -> usize {
    1024 * 1024
}
