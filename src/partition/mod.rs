//! Partition grouping module
//!
//! Groups cleaned listings by their `(year, month)` partition key and renders
//! the Hive-style directory each group is written to.
//!
//! # Overview
//!
//! - `PartitionKey` - the `(year, month)` pair, either half may be null
//! - `partition_listings` - groups a batch by key in a stable order

mod types;

pub use types::{PartitionKey, HIVE_DEFAULT_PARTITION};

use crate::transform::CleanedListing;
use std::collections::BTreeMap;

/// Group listings by partition key
///
/// Keys iterate in ascending order with null components first. Listings keep
/// their batch order inside each group.
pub fn partition_listings(
    listings: Vec<CleanedListing>,
) -> BTreeMap<PartitionKey, Vec<CleanedListing>> {
    let mut groups: BTreeMap<PartitionKey, Vec<CleanedListing>> = BTreeMap::new();
    for listing in listings {
        groups
            .entry(PartitionKey::of(&listing))
            .or_default()
            .push(listing);
    }
    groups
}
