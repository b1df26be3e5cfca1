//! Blob store boundary

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Content type of bronze snapshots
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of silver and gold parquet files
pub const PARQUET_CONTENT_TYPE: &str = "application/octet-stream";

/// Minimal object store used by the pipeline
///
/// Keys are `/`-separated and relative to the bucket. Listing is by path
/// segment prefix and returns full keys sorted ascending.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object, returning its printable location
    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str)
        -> Result<String>;

    /// Read a whole object
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// List keys under a prefix
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

/// Backend selected from the store URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// AWS S3, credentials from the environment
    S3,
    /// A directory per bucket under a local root
    Local(std::path::PathBuf),
    /// Process-local memory
    Memory,
}

impl StoreBackend {
    /// URL scheme used when printing locations
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Local(_) => "file",
            Self::Memory => "memory",
        }
    }

    /// Whether puts may carry object attributes such as content type
    pub fn supports_attributes(&self) -> bool {
        !matches!(self, Self::Local(_))
    }
}
