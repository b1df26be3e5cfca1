//! Object store access
//!
//! The pipeline only needs put, get and prefix listing; [`BlobStore`]
//! captures that and [`ObjectStoreBlobStore`] implements it for S3, local
//! directories and memory.

mod object;
mod types;

pub use object::ObjectStoreBlobStore;
pub use types::{BlobStore, StoreBackend, JSON_CONTENT_TYPE, PARQUET_CONTENT_TYPE};
