// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # jobfeed-etl
//!
//! Batch ETL for job-listing feeds. Raw JSON containers, each holding an
//! `items` list of postings, are flattened, deduplicated by job id,
//! cleaned, and appended to a Hive-partitioned Parquet dataset.
//!
//! ## Features
//!
//! - **Any Object Store**: read and write local paths, S3, R2, GCS and Azure
//! - **JSON or JSONL Input**: one container per file or one per line
//! - **Degrade, Don't Drop**: bad per-row fields become null, rows survive
//! - **Append-Only Output**: `year=Y/month=M/part-*.parquet`, never overwritten
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jobfeed_etl::{Pipeline, PipelineConfig, Result, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::default()
//!         .with_source("s3://adzuna-etl/raw_data/to_process/")
//!         .with_destination("s3://adzuna-etl/transformed_data/");
//!
//!     let mut pipeline = Pipeline::from_config(&config, RunOptions::default())?;
//!     let stats = pipeline.run().await?;
//!     println!("wrote {} listings", stats.listings_written());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌────────────┐   ┌───────────┐   ┌──────────┐
//! │  Source  │──▶│  Decode  │──▶│ Transform  │──▶│ Partition │──▶│  Output  │
//! ├──────────┤   ├──────────┤   ├────────────┤   ├───────────┤   ├──────────┤
//! │ S3 / R2  │   │ JSON     │   │ Flatten    │   │ year=Y    │   │ Arrow    │
//! │ GCS / Az │   │ JSONL    │   │ Dedup      │   │ month=M   │   │ Parquet  │
//! │ Local    │   │ Auto     │   │ Clean      │   │ default   │   │ Append   │
//! └──────────┘   └──────────┘   └────────────┘   └───────────┘   └──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pipeline configuration
pub mod config;

/// Container decoders (JSON, JSONL)
pub mod decode;

/// Object storage locations
pub mod storage;

/// Raw input reader
pub mod source;

/// Listing normalization
pub mod transform;

/// Partitioning by creation month
pub mod partition;

/// Arrow/Parquet output
pub mod output;

/// Pipeline driver
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use partition::PartitionKey;
pub use pipeline::{Pipeline, RunOptions, RunStats};
pub use transform::{normalize_batch, CleanedListing};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
