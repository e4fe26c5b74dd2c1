//! Pipeline types
//!
//! Run options and run statistics.

use crate::partition::PartitionKey;
use crate::transform::NormalizeStats;
use serde::Serialize;

/// Options for a pipeline run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Normalize and partition without writing anything
    pub dry_run: bool,
}

impl RunOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable dry-run mode
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// One partition handed to the sink
#[derive(Debug, Clone, Serialize)]
pub struct WrittenPartition {
    /// Partition key
    pub partition: PartitionKey,
    /// Listings in the partition
    pub rows: usize,
    /// Where the sink put them (None in dry-run mode)
    pub path: Option<String>,
}

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Source files read
    pub files_read: usize,
    /// Transform counters
    pub normalize: NormalizeStats,
    /// Partitions produced, in write order
    pub partitions: Vec<WrittenPartition>,
    /// Whether anything was written
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Listings handed to the sink (or that would have been)
    pub fn listings_written(&self) -> usize {
        self.partitions.iter().map(|p| p.rows).sum()
    }

    /// Number of partitions produced
    pub fn partitions_written(&self) -> usize {
        self.partitions.len()
    }
}
