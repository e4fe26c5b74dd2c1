//! Listing types
//!
//! The projected input row and the cleaned output record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nested paths read from each element of `items`
pub const ID_PATH: &str = "id";
pub const TITLE_PATH: &str = "title";
pub const COMPANY_PATH: &str = "company.display_name";
pub const CATEGORY_PATH: &str = "category.label";
pub const URL_PATH: &str = "redirect_url";
pub const CREATED_PATH: &str = "created";
pub const LOCATION_PATH: &str = "location.display_name";

/// A listing after projection, before any cleanup
///
/// Every field is optional: a missing or non-scalar value is already null here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub id: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub redirect_url: Option<String>,
    pub created: Option<String>,
    pub location: Option<String>,
}

/// A cleaned, partition-tagged listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedListing {
    /// Natural key, unique within a batch
    pub job_id: Option<String>,
    pub job_title: Option<String>,
    pub job_company: Option<String>,
    /// Category label with `job`/`jobs` removed
    pub job_category: Option<String>,
    pub job_url: Option<String>,
    /// Creation time, null when the source value could not be parsed
    pub job_created: Option<DateTime<Utc>>,
    pub job_city: Option<String>,
    pub job_region: Option<String>,
    /// Partition year, null when `job_created` is null
    pub year: Option<i32>,
    /// Partition month (1-12), null when `job_created` is null
    pub month: Option<i32>,
}

/// Counters collected while normalizing a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    /// Containers validated
    pub containers: usize,
    /// Rows produced by flattening `items`
    pub rows_flattened: usize,
    /// Rows removed by `job_id` deduplication
    pub duplicates_dropped: usize,
    /// Listings emitted
    pub listings: usize,
    /// Listings without a `job_id`
    pub missing_job_id: usize,
    /// Listings whose `created` value was absent or unparsable
    pub unparsable_created: usize,
    /// Listings without a city
    pub missing_location: usize,
    /// Listings whose category was absent or emptied by cleanup
    pub empty_category: usize,
}
