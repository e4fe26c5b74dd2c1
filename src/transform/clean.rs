//! Field cleanup helpers
//!
//! Each helper is total: bad input degrades to `None`, never to an error.

use crate::types::{trimmed_non_empty, JsonValue};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Matches the `job` / `jobs` artifact in category labels, any case
static JOB_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)jobs?").unwrap());

/// Naive timestamp layouts accepted after RFC 3339, read as UTC
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Resolve a dot-separated path inside a JSON value
///
/// Returns `None` as soon as a segment is missing or the current value is not
/// an object.
pub fn lookup_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// Read a scalar at `path` as a string
///
/// Strings pass through verbatim, numbers and booleans use their JSON text.
/// Null, objects and arrays yield `None`.
pub fn scalar_string(value: &JsonValue, path: &str) -> Option<String> {
    match lookup_path(value, path)? {
        JsonValue::String(s) => Some(s.clone()),
        v @ (JsonValue::Number(_) | JsonValue::Bool(_)) => Some(v.to_string()),
        _ => None,
    }
}

/// Strip every `job` / `jobs` occurrence (case-insensitive) and trim
///
/// Removal repeats until no match is left, so `"JoJobsbs"` cannot leave a
/// fresh `jobs` behind. An empty result is `None`.
pub fn clean_category(category: Option<&str>) -> Option<String> {
    let mut cleaned = category?.to_string();
    while JOB_TOKEN.is_match(&cleaned) {
        cleaned = JOB_TOKEN.replace_all(&cleaned, "").into_owned();
    }
    trimmed_non_empty(&cleaned)
}

/// Split a `"City, Region, Country"` location into trimmed city and region
///
/// Segments past the second are ignored. Empty-after-trim segments are `None`.
pub fn split_location(location: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(location) = location else {
        return (None, None);
    };

    let mut parts = location.split(',');
    let city = parts.next().and_then(trimmed_non_empty);
    let region = parts.next().and_then(trimmed_non_empty);
    (city, region)
}

/// Parse a listing creation timestamp
///
/// RFC 3339 values keep their offset and are converted to UTC. Naive
/// date-times and bare dates are taken as UTC.
pub fn parse_created(created: Option<&str>) -> Option<DateTime<Utc>> {
    let s = created?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(ndt, Utc));
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let ndt = date.and_hms_opt(0, 0, 0)?;
    Some(DateTime::from_naive_utc_and_offset(ndt, Utc))
}

/// Derive the `(year, month)` partition pair from a creation time
pub fn partition_of(created: Option<DateTime<Utc>>) -> (Option<i32>, Option<i32>) {
    match created {
        Some(dt) => (Some(dt.year()), i32::try_from(dt.month()).ok()),
        None => (None, None),
    }
}
