//! Pipeline orchestrator
//!
//! Sequences extraction, bronze landing, the incremental silver pass and
//! gold curation. Every step finishes its write before the next listing;
//! a failure stops the run without undoing earlier writes.

use super::types::RunReport;
use crate::config::{BoardConfig, PipelineConfig};
use crate::curate::Curator;
use crate::diff::{DiffOutcome, IncrementalDiffer};
use crate::error::{Error, Result, ResultExt};
use crate::flatten::TabularBatch;
use crate::http::HttpClient;
use crate::layout::{Layer, LayerLocation, Period, Stamp};
use crate::output::{encode_batch, ColumnTyping, ParquetWriterConfig};
use crate::pagination::{CursorPaginator, Extraction, PageSource};
use crate::source::MondayClient;
use crate::store::{BlobStore, ObjectStoreBlobStore};
use bytes::Bytes;
use chrono::Local;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// monday.com → bronze → silver → gold pipeline
pub struct Pipeline {
    config: PipelineConfig,
    store: Arc<dyn BlobStore>,
    source: Option<Arc<dyn PageSource>>,
    curator: Curator,
    writer_config: ParquetWriterConfig,
}

impl Pipeline {
    /// Create a pipeline over a store, without a page source
    pub fn new(config: PipelineConfig, store: Arc<dyn BlobStore>) -> Self {
        let curator = Curator::new(config.curation.clone());
        Self {
            config,
            store,
            source: None,
            curator,
            writer_config: ParquetWriterConfig::default(),
        }
    }

    /// Build the store and, when a token is configured, the GraphQL client
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        let store = Arc::new(ObjectStoreBlobStore::parse(&config.store.url)?);
        let mut pipeline = Self::new(config, store);

        if pipeline.config.api_token().is_ok() {
            let http = HttpClient::with_config(pipeline.config.http_config()?)?;
            let client = MondayClient::new(http, pipeline.config.source.endpoint.clone());
            debug!("Extracting from {}", client.endpoint());
            pipeline.source = Some(Arc::new(client));
        } else {
            debug!("No API token configured; extraction disabled");
        }

        Ok(pipeline)
    }

    /// Use a specific page source
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn PageSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Override parquet settings for silver and gold files
    #[must_use]
    pub fn with_writer_config(mut self, config: ParquetWriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Full run: extract every board, diff silver, curate gold
    ///
    /// Gold is skipped when no snapshot was pending.
    pub async fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let (stamp, period) = Self::clock();
        let mut report = RunReport::new(stamp.as_str(), period.as_str());
        info!("Starting pipeline run {stamp}");

        self.extract_into(&stamp, &period, &mut report).await?;

        match self.silver_into(&period, &mut report).await? {
            Some(batch) => self.gold_into(&batch, &stamp, &period, &mut report).await?,
            None => info!("No new silver data; skipping gold"),
        }

        report.set_duration(elapsed_ms(start));
        info!(
            "Pipeline run {stamp} finished in {}ms",
            report.duration_ms
        );
        Ok(report)
    }

    /// Extract and land bronze snapshots only
    pub async fn extract(&self) -> Result<RunReport> {
        let start = Instant::now();
        let (stamp, period) = Self::clock();
        let mut report = RunReport::new(stamp.as_str(), period.as_str());

        self.extract_into(&stamp, &period, &mut report).await?;

        report.set_duration(elapsed_ms(start));
        Ok(report)
    }

    /// Incremental bronze → silver pass only
    pub async fn silver(&self, period: Option<Period>) -> Result<RunReport> {
        let start = Instant::now();
        let (stamp, current) = Self::clock();
        let period = period.unwrap_or(current);
        let mut report = RunReport::new(stamp.as_str(), period.as_str());

        self.silver_into(&period, &mut report).await?;

        report.set_duration(elapsed_ms(start));
        Ok(report)
    }

    /// Curate every silver batch of a period into a fresh gold file
    pub async fn rebuild_gold(&self, period: Option<Period>) -> Result<RunReport> {
        let start = Instant::now();
        let (stamp, current) = Self::clock();
        let period = period.unwrap_or(current);
        let mut report = RunReport::new(stamp.as_str(), period.as_str());
        info!("Rebuilding gold for period {period}");

        let mut batch = TabularBatch::default();
        for board in &self.config.source.boards {
            let (stamps, rows) = self.differ(board).load_silver(&period).await?;
            if !stamps.is_empty() {
                report.stamps_processed.insert(
                    board.label().to_string(),
                    stamps.iter().map(ToString::to_string).collect(),
                );
            }
            batch.extend(rows);
        }
        report.silver_rows = batch.len();

        if report.stamps_processed.is_empty() {
            warn!("No silver batches in period {period}; nothing to rebuild");
        } else {
            self.gold_into(&batch, &stamp, &period, &mut report).await?;
        }

        report.set_duration(elapsed_ms(start));
        Ok(report)
    }

    /// Pending bronze stamps per board, without writing anything
    pub async fn pending(&self, period: Option<Period>) -> Result<BTreeMap<String, BTreeSet<Stamp>>> {
        let period = period.unwrap_or_else(Period::current);
        let mut pending = BTreeMap::new();

        for board in &self.config.source.boards {
            let stamps = self.differ(board).pending(&period).await?;
            debug!("Board {}: {} pending", board.label(), stamps.len());
            pending.insert(board.label().to_string(), stamps);
        }

        Ok(pending)
    }

    // ========================================================================
    // Steps
    // ========================================================================

    async fn extract_into(
        &self,
        stamp: &Stamp,
        period: &Period,
        report: &mut RunReport,
    ) -> Result<()> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| Error::missing_field(self.config.source.token_env.clone()))?;
        self.config.validate()?;

        for board in &self.config.source.boards {
            let (extraction, landed) = self.extract_board(source, board, stamp, period).await?;
            report.add_extraction(
                extraction.items.len(),
                extraction.pages() as usize,
                landed,
            );
        }
        Ok(())
    }

    async fn extract_board(
        &self,
        source: &dyn PageSource,
        board: &BoardConfig,
        stamp: &Stamp,
        period: &Period,
    ) -> Result<(Extraction, String)> {
        let paginator = CursorPaginator::new(self.config.source.page_limit);
        let fetch = paginator.fetch_all(source, &board.id);

        let extraction = match self.config.source.extract_timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fetch)
                .await
                .map_err(|_| Error::Timeout {
                    timeout_ms: secs * 1000,
                })??,
            None => fetch.await?,
        };

        let body = serde_json::to_vec_pretty(&extraction.items)
            .with_context(|| format!("Failed to serialize items of board {}", board.label()))?;
        let location = self.board_location(self.config.bronze_location(), board);
        let key = location.key(period, stamp);
        let landed = self
            .store
            .put(
                &location.bucket,
                &key,
                Bytes::from(body),
                Layer::Bronze.content_type(),
            )
            .await?;
        info!(
            "Bronze landed: {landed} ({} items)",
            extraction.items.len()
        );

        Ok((extraction, landed))
    }

    async fn silver_into(
        &self,
        period: &Period,
        report: &mut RunReport,
    ) -> Result<Option<TabularBatch>> {
        let mut batch = TabularBatch::default();

        for board in &self.config.source.boards {
            let outcome = self
                .differ(board)
                .run(period, self.origin(board))
                .await?;

            if let DiffOutcome::Processed { stamps, batch: rows } = outcome {
                report.stamps_processed.insert(
                    board.label().to_string(),
                    stamps.iter().map(ToString::to_string).collect(),
                );
                batch.extend(rows);
            }
        }

        report.silver_rows = batch.len();
        if report.stamps_processed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }

    async fn gold_into(
        &self,
        batch: &TabularBatch,
        stamp: &Stamp,
        period: &Period,
        report: &mut RunReport,
    ) -> Result<()> {
        let curated = self.curator.curate(batch);
        let data = encode_batch(&curated, ColumnTyping::Inferred, &self.writer_config)?;

        let gold = self.config.gold_location();
        let key = gold.key(period, stamp);
        let location = self
            .store
            .put(&gold.bucket, &key, data, Layer::Gold.content_type())
            .await?;
        info!("Gold written: {location} ({} rows)", curated.len());

        report.rows_curated = curated.len();
        report.gold_key = Some(location);
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn clock() -> (Stamp, Period) {
        let now = Local::now().naive_local();
        (Stamp::at(now), Period::of(now))
    }

    fn is_multi_board(&self) -> bool {
        self.config.source.boards.len() > 1
    }

    /// Boards get their own sub-prefix only when several are configured
    fn board_location(&self, base: LayerLocation, board: &BoardConfig) -> LayerLocation {
        if self.is_multi_board() {
            base.child(board.label())
        } else {
            base
        }
    }

    fn origin<'a>(&self, board: &'a BoardConfig) -> Option<&'a str> {
        self.is_multi_board().then(|| board.label())
    }

    fn differ(&self, board: &BoardConfig) -> IncrementalDiffer {
        IncrementalDiffer::new(
            Arc::clone(&self.store),
            self.board_location(self.config.bronze_location(), board),
            self.board_location(self.config.silver_location(), board),
        )
        .with_writer_config(self.writer_config.clone())
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
