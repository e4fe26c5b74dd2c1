//! Arrow schema for cleaned listings and batch conversion
//!
//! Converts cleaned listings into Arrow RecordBatches and back into JSON rows.

use crate::error::{Error, Result};
use crate::transform::CleanedListing;
use arrow::array::{
    Array, ArrayRef, Int32Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, SecondsFormat};
use serde_json::Value;
use std::sync::Arc;

/// Columns encoded in the directory path rather than in data files
pub const PARTITION_COLUMNS: [&str; 2] = ["year", "month"];

/// Timezone attached to `job_created`
const UTC: &str = "UTC";

/// Full schema of a cleaned listing, partition columns included
pub fn cleaned_listing_schema() -> Schema {
    Schema::new(vec![
        Field::new("job_id", DataType::Utf8, true),
        Field::new("job_title", DataType::Utf8, true),
        Field::new("job_company", DataType::Utf8, true),
        Field::new("job_category", DataType::Utf8, true),
        Field::new("job_url", DataType::Utf8, true),
        Field::new(
            "job_created",
            DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into())),
            true,
        ),
        Field::new("job_city", DataType::Utf8, true),
        Field::new("job_region", DataType::Utf8, true),
        Field::new("year", DataType::Int32, true),
        Field::new("month", DataType::Int32, true),
    ])
}

/// Schema of the Parquet data files (no partition columns)
pub fn data_file_schema() -> Schema {
    let fields: Vec<Field> = cleaned_listing_schema()
        .fields()
        .iter()
        .filter(|f| !PARTITION_COLUMNS.contains(&f.name().as_str()))
        .map(|f| f.as_ref().clone())
        .collect();
    Schema::new(fields)
}

/// Convert cleaned listings to an Arrow RecordBatch
///
/// With `include_partition_columns` false the batch matches
/// [`data_file_schema`].
pub fn listings_to_batch(
    listings: &[CleanedListing],
    include_partition_columns: bool,
) -> Result<RecordBatch> {
    let schema = if include_partition_columns {
        cleaned_listing_schema()
    } else {
        data_file_schema()
    };

    let strings = |get: fn(&CleanedListing) -> Option<&str>| -> ArrayRef {
        Arc::new(listings.iter().map(get).collect::<StringArray>())
    };

    let created: TimestampMicrosecondArray = listings
        .iter()
        .map(|l| l.job_created.map(|dt| dt.timestamp_micros()))
        .collect::<TimestampMicrosecondArray>()
        .with_timezone(UTC);

    let mut columns: Vec<ArrayRef> = vec![
        strings(|l| l.job_id.as_deref()),
        strings(|l| l.job_title.as_deref()),
        strings(|l| l.job_company.as_deref()),
        strings(|l| l.job_category.as_deref()),
        strings(|l| l.job_url.as_deref()),
        Arc::new(created),
        strings(|l| l.job_city.as_deref()),
        strings(|l| l.job_region.as_deref()),
    ];

    if include_partition_columns {
        columns.push(Arc::new(
            listings.iter().map(|l| l.year).collect::<Int32Array>(),
        ));
        columns.push(Arc::new(
            listings.iter().map(|l| l.month).collect::<Int32Array>(),
        ));
    }

    RecordBatch::try_new(Arc::new(schema), columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Convert an Arrow RecordBatch of listings to JSON rows
///
/// Timestamps render as RFC 3339 strings in UTC.
pub fn batch_to_json(batch: &RecordBatch) -> Result<Vec<Value>> {
    let schema = batch.schema();
    let mut records = Vec::with_capacity(batch.num_rows());

    for row_idx in 0..batch.num_rows() {
        let mut record = serde_json::Map::new();

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let value = array_value_to_json(batch.column(col_idx).as_ref(), row_idx)?;
            record.insert(field.name().clone(), value);
        }

        records.push(Value::Object(record));
    }

    Ok(records)
}

/// Convert an Arrow RecordBatch back into cleaned listings
///
/// Partition columns missing from the batch (data files) come back as null.
pub fn batch_to_listings(batch: &RecordBatch) -> Result<Vec<CleanedListing>> {
    batch_to_json(batch)?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(Error::from))
        .collect()
}

/// Convert a single array element to JSON
fn array_value_to_json(array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    match array.data_type() {
        DataType::Utf8 => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::output("Failed to downcast to StringArray"))?;
            Ok(Value::String(arr.value(row).to_string()))
        }

        DataType::Int32 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| Error::output("Failed to downcast to Int32Array"))?;
            Ok(Value::Number(arr.value(row).into()))
        }

        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let arr = array
                .as_any()
                .downcast_ref::<TimestampMicrosecondArray>()
                .ok_or_else(|| Error::output("Failed to downcast to TimestampMicrosecondArray"))?;
            let micros = arr.value(row);
            let dt = DateTime::from_timestamp_micros(micros)
                .ok_or_else(|| Error::output(format!("Timestamp out of range: {micros}")))?;
            Ok(Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
        }

        other => Err(Error::output(format!(
            "Unsupported column type in listing batch: {other:?}"
        ))),
    }
}
