//! Parquet encoding to and from in-memory buffers
//!
//! Silver and gold files go straight to the object store, so nothing here
//! touches the local filesystem.

use super::schema::{arrow_to_batch, batch_to_arrow, ColumnTyping};
use crate::error::{Error, Result};
use crate::flatten::TabularBatch;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        builder.build()
    }
}

/// Encode a RecordBatch as a complete parquet file
pub fn write_parquet_bytes(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let props = config.build_properties();
    let mut writer = ArrowWriter::try_new(Vec::new(), batch.schema(), Some(props))
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;

    writer
        .write(batch)
        .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;

    let buffer = writer
        .into_inner()
        .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;
    Ok(Bytes::from(buffer))
}

/// Decode every record batch of a parquet file
pub fn read_parquet_bytes(data: Bytes) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Rows → parquet bytes
pub fn encode_batch(
    batch: &TabularBatch,
    typing: ColumnTyping,
    config: &ParquetWriterConfig,
) -> Result<Bytes> {
    let record_batch = batch_to_arrow(batch, typing)?;
    write_parquet_bytes(&record_batch, config)
}

/// Parquet bytes → rows
pub fn decode_batch(data: Bytes) -> Result<TabularBatch> {
    read_parquet_bytes(data)?
        .iter()
        .map(arrow_to_batch)
        .collect::<Result<TabularBatch>>()
}
