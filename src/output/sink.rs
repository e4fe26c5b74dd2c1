//! Partitioned listing sinks
//!
//! A sink receives one partition at a time. [`ParquetSink`] writes Hive-style
//! Parquet files to a storage location, [`MemorySink`] keeps them in memory.

use super::schema::listings_to_batch;
use super::writer::{encode_parquet, ParquetWriterConfig};
use crate::error::{Result, ResultExt};
use crate::partition::PartitionKey;
use crate::storage::StorageLocation;
use crate::transform::CleanedListing;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

/// Destination for partitioned listings
#[async_trait]
pub trait ListingSink: Send + Sync {
    /// Append one partition's listings, returning where they went
    async fn write_partition(
        &mut self,
        key: &PartitionKey,
        listings: &[CleanedListing],
    ) -> Result<String>;
}

/// Build the object key of a partition file
///
/// Format: `year={Y}/month={M}/part-{seq:05}-{run_id}.parquet`
pub fn partition_file_key(key: &PartitionKey, seq: usize, run_id: &Uuid) -> String {
    format!("{}/part-{seq:05}-{run_id}.parquet", key.hive_path())
}

/// Appends Parquet files under a storage location
///
/// Every sink instance picks a fresh run id, so its file names never collide
/// with files from earlier runs and nothing is overwritten.
pub struct ParquetSink {
    location: StorageLocation,
    config: ParquetWriterConfig,
    run_id: Uuid,
    next_part: usize,
}

impl ParquetSink {
    /// Create a sink writing to `location`
    pub fn new(location: StorageLocation, config: ParquetWriterConfig) -> Self {
        Self {
            location,
            config,
            run_id: Uuid::new_v4(),
            next_part: 0,
        }
    }

    /// Identifier embedded in every file this sink writes
    pub fn run_id(&self) -> &Uuid {
        &self.run_id
    }
}

#[async_trait]
impl ListingSink for ParquetSink {
    async fn write_partition(
        &mut self,
        key: &PartitionKey,
        listings: &[CleanedListing],
    ) -> Result<String> {
        let data = listings_to_batch(listings, false)
            .and_then(|batch| encode_parquet(&batch, &self.config))
            .with_context(|| format!("Failed to encode partition {key}"))?;

        let file_key = partition_file_key(key, self.next_part, &self.run_id);
        self.next_part += 1;

        let written = self.location.put(&file_key, data).await?;
        info!(partition = %key, rows = listings.len(), path = %written, "Wrote partition");
        Ok(written)
    }
}

/// Sink that keeps partitions in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    partitions: Vec<(PartitionKey, Vec<CleanedListing>)>,
}

impl MemorySink {
    /// Create an empty memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions received so far, in write order
    pub fn partitions(&self) -> &[(PartitionKey, Vec<CleanedListing>)] {
        &self.partitions
    }

    /// All listings received so far
    pub fn listings(&self) -> impl Iterator<Item = &CleanedListing> {
        self.partitions.iter().flat_map(|(_, listings)| listings)
    }
}

#[async_trait]
impl ListingSink for MemorySink {
    async fn write_partition(
        &mut self,
        key: &PartitionKey,
        listings: &[CleanedListing],
    ) -> Result<String> {
        self.partitions.push((*key, listings.to_vec()));
        Ok(format!("memory://{}", key.hive_path()))
    }
}
