//! [`BlobStore`] over the `object_store` crate (S3, local, in-memory)

use super::types::{BlobStore, StoreBackend};
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Object store handles keyed by bucket, created on first use
pub struct ObjectStoreBlobStore {
    backend: StoreBackend,
    buckets: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl std::fmt::Debug for ObjectStoreBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreBlobStore")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreBlobStore {
    /// Parse a store URL
    ///
    /// Supported formats:
    /// - `s3://` - AWS S3, one bucket per layer
    /// - `file:///data/lake` or `/data/lake` - local directory per bucket
    /// - `memory://` - in-memory, for tests and dry runs
    pub fn parse(url: &str) -> Result<Self> {
        let backend = if let Some(rest) = url.strip_prefix("s3://") {
            if !rest.trim_matches('/').is_empty() {
                return Err(Error::config(format!(
                    "S3 store URL takes no bucket or path (buckets are configured per layer): {url}"
                )));
            }
            StoreBackend::S3
        } else if url.starts_with("memory://") {
            StoreBackend::Memory
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            if path.is_empty() {
                return Err(Error::config("Local store path is empty"));
            }
            StoreBackend::Local(path.into())
        };

        Ok(Self::new(backend))
    }

    /// Create a store for an explicit backend
    pub fn new(backend: StoreBackend) -> Self {
        Self {
            backend,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// In-memory store
    pub fn in_memory() -> Self {
        Self::new(StoreBackend::Memory)
    }

    /// Selected backend
    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    /// Printable location of a key
    pub fn location(&self, bucket: &str, key: &str) -> String {
        format!("{}://{bucket}/{key}", self.backend.scheme())
    }

    fn bucket(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|_| Error::store("Bucket registry lock poisoned"))?;

        if let Some(store) = buckets.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let store = self.open_bucket(bucket)?;
        buckets.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }

    fn open_bucket(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        debug!("Opening {} bucket {bucket}", self.backend.scheme());
        match &self.backend {
            StoreBackend::S3 => {
                let store = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .build()
                    .map_err(|e| Error::store(format!("Failed to create S3 client: {e}")))?;
                Ok(Arc::new(store))
            }
            StoreBackend::Local(root) => {
                let dir = root.join(bucket);
                std::fs::create_dir_all(&dir).map_err(|e| {
                    Error::store(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
                let store = LocalFileSystem::new_with_prefix(&dir)
                    .map_err(|e| Error::store(format!("Failed to create local store: {e}")))?;
                Ok(Arc::new(store))
            }
            StoreBackend::Memory => Ok(Arc::new(InMemory::new())),
        }
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String> {
        let store = self.bucket(bucket)?;
        let path = ObjectPath::from(key);

        let result = if self.backend.supports_attributes() {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
            let options = PutOptions {
                attributes,
                ..Default::default()
            };
            store.put_opts(&path, data.into(), options).await
        } else {
            store.put(&path, data.into()).await
        };

        let location = self.location(bucket, key);
        result.map_err(|e| Error::store(format!("Failed to write {location}: {e}")))?;
        Ok(location)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let store = self.bucket(bucket)?;
        let path = ObjectPath::from(key);
        let bytes = store.get(&path).await?.bytes().await?;
        Ok(bytes)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let store = self.bucket(bucket)?;
        let prefix = ObjectPath::from(prefix);

        let mut keys: Vec<String> = store
            .list(Some(&prefix))
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await?;
        keys.sort();
        Ok(keys)
    }
}
