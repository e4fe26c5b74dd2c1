//! Normalization transform
//!
//! Turns source containers (`{"items": [...]}`) into cleaned listings.
//!
//! # Overview
//!
//! The transform is a pure, single-pass function over one batch:
//!
//! 1. validate that every container exposes `items` (the only fatal check)
//! 2. flatten `items` into one row per listing
//! 3. project the nested fields of each listing
//! 4. deduplicate by `job_id` across the whole batch
//! 5. clean the category, split the location, parse the creation time
//! 6. derive the `(year, month)` partition keys
//!
//! Field-level problems never fail a row; they degrade to null.

mod clean;
mod types;

pub use clean::{
    clean_category, lookup_path, parse_created, partition_of, scalar_string, split_location,
};
pub use types::{
    CleanedListing, NormalizeStats, RawListing, CATEGORY_PATH, COMPANY_PATH, CREATED_PATH,
    ID_PATH, LOCATION_PATH, TITLE_PATH, URL_PATH,
};

use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::collections::HashSet;

/// Name of the list field every container must expose
pub const ITEMS_FIELD: &str = "items";

/// Check that every container is an object with a list-valued `items` field
///
/// An explicit `"items": null` counts as an empty list. A missing field fails
/// the whole batch.
pub fn validate_containers(containers: &[JsonValue]) -> Result<()> {
    for (idx, container) in containers.iter().enumerate() {
        match container.get(ITEMS_FIELD) {
            None => return Err(Error::missing_field(ITEMS_FIELD)),
            Some(JsonValue::Array(_) | JsonValue::Null) => {}
            Some(other) => {
                return Err(Error::decode(format!(
                    "Field '{ITEMS_FIELD}' in container {idx} must be a list, got {}",
                    json_type_name(other)
                )))
            }
        }
    }
    Ok(())
}

/// Expand every container's `items` list into individual rows
pub fn flatten_items(containers: &[JsonValue]) -> Vec<&JsonValue> {
    containers
        .iter()
        .filter_map(|c| c.get(ITEMS_FIELD).and_then(JsonValue::as_array))
        .flatten()
        .collect()
}

/// Project the listing fields out of one `items` element
pub fn project_listing(item: &JsonValue) -> RawListing {
    RawListing {
        id: scalar_string(item, ID_PATH),
        title: scalar_string(item, TITLE_PATH),
        company: scalar_string(item, COMPANY_PATH),
        category: scalar_string(item, CATEGORY_PATH),
        redirect_url: scalar_string(item, URL_PATH),
        created: scalar_string(item, CREATED_PATH),
        location: scalar_string(item, LOCATION_PATH),
    }
}

/// Keep one row per `job_id`
///
/// The first row seen for a key survives. Rows without an id share a single
/// null key, so at most one of them is kept.
pub fn dedup_by_job_id(rows: Vec<RawListing>) -> Vec<RawListing> {
    let mut seen: HashSet<Option<String>> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.id.clone()))
        .collect()
}

/// Apply the per-row cleanup to a deduplicated row
pub fn clean_listing(raw: RawListing) -> CleanedListing {
    let job_created = parse_created(raw.created.as_deref());
    let (year, month) = partition_of(job_created);
    let (job_city, job_region) = split_location(raw.location.as_deref());

    CleanedListing {
        job_id: raw.id,
        job_title: raw.title,
        job_company: raw.company,
        job_category: clean_category(raw.category.as_deref()),
        job_url: raw.redirect_url,
        job_created,
        job_city,
        job_region,
        year,
        month,
    }
}

/// Normalize a batch of containers into cleaned listings
pub fn normalize_batch(containers: &[JsonValue]) -> Result<Vec<CleanedListing>> {
    normalize_batch_with_stats(containers).map(|(listings, _)| listings)
}

/// Normalize a batch and report what happened to it
pub fn normalize_batch_with_stats(
    containers: &[JsonValue],
) -> Result<(Vec<CleanedListing>, NormalizeStats)> {
    validate_containers(containers)?;

    let rows: Vec<RawListing> = flatten_items(containers)
        .into_iter()
        .map(project_listing)
        .collect();
    let rows_flattened = rows.len();

    let unique = dedup_by_job_id(rows);
    let mut stats = NormalizeStats {
        containers: containers.len(),
        rows_flattened,
        duplicates_dropped: rows_flattened - unique.len(),
        ..NormalizeStats::default()
    };

    let listings: Vec<CleanedListing> = unique.into_iter().map(clean_listing).collect();
    for listing in &listings {
        stats.missing_job_id += usize::from(listing.job_id.is_none());
        stats.unparsable_created += usize::from(listing.job_created.is_none());
        stats.missing_location += usize::from(listing.job_city.is_none());
        stats.empty_category += usize::from(listing.job_category.is_none());
    }
    stats.listings = listings.len();

    Ok((listings, stats))
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
