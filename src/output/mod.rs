//! Output module
//!
//! Handles Arrow RecordBatch creation, Parquet encoding and partition sinks.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - The Arrow schema of a cleaned listing
//! - Converting listings to Arrow RecordBatches and back
//! - Encoding Parquet files in memory
//! - Appending Hive-partitioned files to a storage location

mod schema;
mod sink;
mod writer;

pub use schema::{
    batch_to_json, batch_to_listings, cleaned_listing_schema, data_file_schema,
    listings_to_batch, PARTITION_COLUMNS,
};
pub use sink::{partition_file_key, ListingSink, MemorySink, ParquetSink};
pub use writer::{decode_parquet, encode_parquet, ParquetWriter, ParquetWriterConfig};
