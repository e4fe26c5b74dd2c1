//! Pipeline driver module
//!
//! Reads a source, runs the normalization transform over it as one batch and
//! appends the result to a sink.
//!
//! # Overview
//!
//! The pipeline module provides:
//! - `Pipeline` - wires a `ListingSource` to a `ListingSink`
//! - `RunOptions` - dry-run switch
//! - `RunStats` - what a run read, dropped and wrote
//!
//! The whole input is read and validated before the first write, so a
//! fatal input error leaves the destination untouched.

mod types;

pub use types::{RunOptions, RunStats, WrittenPartition};

use crate::config::PipelineConfig;
use crate::decode::build_decoder;
use crate::error::Result;
use crate::output::{ListingSink, ParquetSink};
use crate::partition::partition_listings;
use crate::source::ListingSource;
use crate::storage::StorageLocation;
use crate::transform::normalize_batch_with_stats;
use crate::types::JsonValue;
use object_store::memory::InMemory;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Batch pipeline from a listing source to a listing sink
pub struct Pipeline<S: ListingSink> {
    source: ListingSource,
    sink: S,
    options: RunOptions,
}

impl Pipeline<ParquetSink> {
    /// Build the standard pipeline described by a config
    ///
    /// A dry run never opens the destination; its sink points at a scratch
    /// in-memory store instead.
    pub fn from_config(config: &PipelineConfig, options: RunOptions) -> Result<Self> {
        config.validate()?;

        let source_location = StorageLocation::open(&config.source.path)?;
        let source = ListingSource::new(source_location, build_decoder(config.source.format));

        let destination = if options.dry_run {
            StorageLocation::from_store(Arc::new(InMemory::new()), "")
        } else {
            StorageLocation::create(&config.destination.path)?
        };
        let sink = ParquetSink::new(destination, config.destination.writer_config());

        Ok(Self::new(source, sink).with_options(options))
    }
}

impl<S: ListingSink> Pipeline<S> {
    /// Create a pipeline over an explicit source and sink
    pub fn new(source: ListingSource, sink: S) -> Self {
        Self {
            source,
            sink,
            options: RunOptions::default(),
        }
    }

    /// Set run options
    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the pipeline, returning the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run the pipeline once over everything in the source
    pub async fn run(&mut self) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats {
            dry_run: self.options.dry_run,
            ..RunStats::default()
        };

        let files = self.source.read_all().await?;
        stats.files_read = files.len();
        info!(
            source = %self.source.location().url(),
            files = files.len(),
            "Read source files"
        );

        let containers: Vec<JsonValue> = files.into_iter().flat_map(|f| f.containers).collect();
        let (listings, normalize) = normalize_batch_with_stats(&containers)?;
        stats.normalize = normalize;
        info!(
            containers = normalize.containers,
            rows = normalize.rows_flattened,
            duplicates = normalize.duplicates_dropped,
            listings = normalize.listings,
            "Normalized batch"
        );
        debug!(
            missing_job_id = normalize.missing_job_id,
            unparsable_created = normalize.unparsable_created,
            missing_location = normalize.missing_location,
            empty_category = normalize.empty_category,
            "Degraded fields"
        );

        for (key, group) in partition_listings(listings) {
            let path = if self.options.dry_run {
                None
            } else {
                Some(self.sink.write_partition(&key, &group).await?)
            };
            stats.partitions.push(WrittenPartition {
                partition: key,
                rows: group.len(),
                path,
            });
        }

        stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            partitions = stats.partitions_written(),
            listings = stats.listings_written(),
            dry_run = stats.dry_run,
            duration_ms = stats.duration_ms,
            "Pipeline run complete"
        );

        Ok(stats)
    }
}
