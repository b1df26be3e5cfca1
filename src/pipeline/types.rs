//! Pipeline run reports

use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of one pipeline invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Stamp of this run
    pub stamp: String,
    /// Period written to
    pub period: String,
    /// Items extracted across boards
    pub items_extracted: usize,
    /// Pages fetched across boards
    pub pages_fetched: usize,
    /// Bronze snapshots landed
    pub bronze_keys: Vec<String>,
    /// Silver batches written, per board label
    pub stamps_processed: BTreeMap<String, Vec<String>>,
    /// Rows in the consolidated silver batch
    pub silver_rows: usize,
    /// Rows written to gold
    pub rows_curated: usize,
    /// Gold location, when one was written
    pub gold_key: Option<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    /// Create an empty report for a run
    pub fn new(stamp: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            stamp: stamp.into(),
            period: period.into(),
            ..Default::default()
        }
    }

    /// Record one board's extraction
    pub fn add_extraction(&mut self, items: usize, pages: usize, bronze_key: String) {
        self.items_extracted += items;
        self.pages_fetched += pages;
        self.bronze_keys.push(bronze_key);
    }

    /// Total silver batches written
    pub fn silver_batches(&self) -> usize {
        self.stamps_processed.values().map(Vec::len).sum()
    }

    /// Did this run produce a gold dataset?
    pub fn wrote_gold(&self) -> bool {
        self.gold_key.is_some()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
