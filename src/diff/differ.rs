//! Incremental differ
//!
//! Bronze snapshots without a silver batch of the same stamp are pending.
//! Each pending stamp is flattened and written before the next one is read,
//! so a failure leaves earlier stamps materialized and the failed one
//! pending for the next run.

use super::types::DiffOutcome;
use crate::error::{Error, Result};
use crate::flatten::{format_snapshot_bytes, TabularBatch};
use crate::layout::{Layer, LayerLocation, Period, Stamp};
use crate::output::{decode_batch, encode_batch, ColumnTyping, ParquetWriterConfig};
use crate::store::BlobStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Materializes silver batches for unprocessed bronze snapshots
pub struct IncrementalDiffer {
    store: Arc<dyn BlobStore>,
    bronze: LayerLocation,
    silver: LayerLocation,
    writer_config: ParquetWriterConfig,
}

impl IncrementalDiffer {
    /// Create a differ between a bronze and a silver location
    pub fn new(store: Arc<dyn BlobStore>, bronze: LayerLocation, silver: LayerLocation) -> Self {
        Self {
            store,
            bronze,
            silver,
            writer_config: ParquetWriterConfig::default(),
        }
    }

    /// Override parquet settings for silver files
    #[must_use]
    pub fn with_writer_config(mut self, config: ParquetWriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Stamps present in a location for a period
    pub async fn stamps(&self, location: &LayerLocation, period: &Period) -> Result<BTreeSet<Stamp>> {
        let prefix = location.period_prefix(period);
        let keys = self.store.list(&location.bucket, &prefix).await?;
        debug!(
            "Listed {} keys under {}/{prefix}",
            keys.len(),
            location.bucket
        );

        Ok(keys
            .iter()
            .filter_map(|key| location.layer.stamp_of(key))
            .collect())
    }

    /// Bronze stamps of the period without a silver batch
    pub async fn pending(&self, period: &Period) -> Result<BTreeSet<Stamp>> {
        let bronze = self.stamps(&self.bronze, period).await?;
        if bronze.is_empty() {
            return Ok(bronze);
        }
        let silver = self.stamps(&self.silver, period).await?;
        Ok(bronze.difference(&silver).cloned().collect())
    }

    /// Flatten and write every pending snapshot of the period
    ///
    /// `origin` tags each row with the board it came from.
    pub async fn run(&self, period: &Period, origin: Option<&str>) -> Result<DiffOutcome> {
        let pending = self.pending(period).await?;
        info!(
            "{} pending snapshot(s) in {}/{}",
            pending.len(),
            self.bronze.bucket,
            self.bronze.period_prefix(period)
        );

        if pending.is_empty() {
            return Ok(DiffOutcome::NothingToDo);
        }

        let mut batch = TabularBatch::default();
        let mut stamps = Vec::with_capacity(pending.len());

        for stamp in pending {
            let rows = self
                .materialize(period, &stamp, origin)
                .await
                .map_err(|e| Error::at_stamp(stamp.as_str(), e))?;
            batch.extend(rows);
            stamps.push(stamp);
        }

        info!(
            "Silver consolidated: {} row(s) from {} snapshot(s)",
            batch.len(),
            stamps.len()
        );
        Ok(DiffOutcome::Processed { stamps, batch })
    }

    async fn materialize(
        &self,
        period: &Period,
        stamp: &Stamp,
        origin: Option<&str>,
    ) -> Result<TabularBatch> {
        let bronze_key = self.bronze.key(period, stamp);
        debug!("Reading {}/{bronze_key}", self.bronze.bucket);
        let raw = self.store.get(&self.bronze.bucket, &bronze_key).await?;

        let mut batch = format_snapshot_bytes(&raw)?;
        if let Some(origin) = origin {
            batch.tag_origin(origin);
        }

        let data = encode_batch(&batch, ColumnTyping::Text, &self.writer_config)?;
        let silver_key = self.silver.key(period, stamp);
        let location = self
            .store
            .put(
                &self.silver.bucket,
                &silver_key,
                data,
                Layer::Silver.content_type(),
            )
            .await?;
        info!("Silver written: {location} ({} rows)", batch.len());

        Ok(batch)
    }

    /// Read back every silver batch of the period, in stamp order
    pub async fn load_silver(&self, period: &Period) -> Result<(Vec<Stamp>, TabularBatch)> {
        let stamps = self.stamps(&self.silver, period).await?;
        let mut batch = TabularBatch::default();

        for stamp in &stamps {
            let key = self.silver.key(period, stamp);
            let data = self
                .store
                .get(&self.silver.bucket, &key)
                .await
                .map_err(|e| Error::at_stamp(stamp.as_str(), e))?;
            let rows = decode_batch(data).map_err(|e| Error::at_stamp(stamp.as_str(), e))?;
            batch.extend(rows);
        }

        Ok((stamps.into_iter().collect(), batch))
    }
}
