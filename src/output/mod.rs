//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet encoding.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Inferring Arrow schemas from tabular batches
//! - Converting rows to Arrow RecordBatches and back
//! - Encoding and decoding Parquet files in memory

mod schema;
mod writer;

pub use schema::{arrow_to_batch, batch_to_arrow, infer_schema, ColumnTyping};
pub use writer::{
    decode_batch, encode_batch, read_parquet_bytes, write_parquet_bytes, ParquetWriterConfig,
};
