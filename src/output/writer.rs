//! Parquet writer
//!
//! Provides utilities for encoding Arrow RecordBatches as Parquet.

use crate::error::{Error, Result};
use crate::types::CompressionCodec;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl ParquetWriterConfig {
    /// Get the compression codec
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Get dictionary encoding enabled
    #[must_use]
    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Get statistics enabled
    #[must_use]
    pub fn is_statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression codec
    #[must_use]
    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.compression = codec.into();
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder =
                builder.set_statistics_enabled(parquet::file::properties::EnabledStatistics::None);
        }

        builder.build()
    }
}

/// Incremental Parquet writer over any `Write` sink
pub struct ParquetWriter<W: Write + Send> {
    /// Arrow writer
    writer: ArrowWriter<W>,
    /// Number of rows written
    rows_written: usize,
}

impl<W: Write + Send> ParquetWriter<W> {
    /// Create a new Parquet writer
    pub fn new(sink: W, schema: &Schema, config: &ParquetWriterConfig) -> Result<Self> {
        let props = config.build_properties();
        let writer =
            ArrowWriter::try_new(sink, Arc::new(schema.clone()), Some(props)).map_err(|e| {
                Error::Output {
                    message: format!("Failed to create Parquet writer: {e}"),
                }
            })?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch).map_err(|e| Error::Output {
            message: format!("Failed to write batch: {e}"),
        })?;

        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Finalize the file and hand back the underlying sink
    pub fn finish(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| Error::Output {
            message: format!("Failed to close Parquet writer: {e}"),
        })
    }
}

/// Encode one RecordBatch as an in-memory Parquet file
pub fn encode_parquet(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut writer = ParquetWriter::new(Vec::new(), batch.schema().as_ref(), config)?;
    writer.write(batch)?;
    Ok(Bytes::from(writer.finish()?))
}

/// Decode an in-memory Parquet file into RecordBatches
pub fn decode_parquet(data: Bytes) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
    reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::from)
}
