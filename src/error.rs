//! Error types for jobfeed-etl
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Only batch-level failures surface here. Per-row field problems degrade to
//! null inside the transform and never become an `Error`.

use thiserror::Error;

/// The main error type for jobfeed-etl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Missing required field '{field}' in source data")]
    MissingField { field: String },

    #[error("Failed to decode input: {message}")]
    Decode { message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing config field error
    pub fn missing_config_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing input field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error rejects the input batch itself
    ///
    /// These are the failures a retry with the same input cannot fix.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::MissingField { .. } | Error::Decode { .. })
    }
}

/// Result type alias for jobfeed-etl
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("items");
        assert_eq!(
            err.to_string(),
            "Missing required field 'items' in source data"
        );

        let err = Error::invalid_config("row_group_size", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'row_group_size': must be positive"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::missing_field("items").is_input_error());
        assert!(Error::decode("bad json").is_input_error());

        assert!(!Error::config("test").is_input_error());
        assert!(!Error::storage("unreachable").is_input_error());
        assert!(!Error::output("disk full").is_input_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
