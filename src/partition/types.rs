//! Partition types
//!
//! Defines the partition key and its Hive path rendering.

use crate::transform::CleanedListing;
use serde::Serialize;
use std::fmt;

/// Directory value used for a null partition component (Hive convention)
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// The `(year, month)` pair a listing is written under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PartitionKey {
    /// Creation year
    pub year: Option<i32>,
    /// Creation month (1-12)
    pub month: Option<i32>,
}

impl PartitionKey {
    /// Create a key from explicit parts
    pub fn new(year: Option<i32>, month: Option<i32>) -> Self {
        Self { year, month }
    }

    /// Key of a cleaned listing
    pub fn of(listing: &CleanedListing) -> Self {
        Self::new(listing.year, listing.month)
    }

    /// Render as `year=2023/month=5`
    pub fn hive_path(&self) -> String {
        format!(
            "year={}/month={}",
            hive_value(self.year),
            hive_value(self.month)
        )
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hive_path())
    }
}

fn hive_value(value: Option<i32>) -> String {
    value.map_or_else(|| HIVE_DEFAULT_PARTITION.to_string(), |v| v.to_string())
}
