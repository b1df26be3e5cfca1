//! Silver → gold curation
//!
//! Steps run in a fixed order on every row:
//! 1. pick the business key (project code, else item name)
//! 2. derive `id_projeto` from it
//! 3. normalize column names
//! 4. sum the pipe-delimited monetary columns

use super::types::{CurationConfig, PROJECT_ID};
use crate::flatten::{Cell, Row, TabularBatch, ITEM_NAME};
use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Accent-stripped, lowercase, `[a-z0-9_]` column name
pub fn normalize_column_name(name: &str) -> String {
    let ascii = deunicode(name).to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&ascii, "_")
        .trim_matches('_')
        .to_string()
}

/// UUIDv5 (DNS namespace) of the lowercased, trimmed key
pub fn stable_id(key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, key.trim().to_lowercase().as_bytes())
}

/// Sum of a `" | "`-delimited list of pt-BR formatted numbers
///
/// `.` is a thousands separator and `,` the decimal mark. Unparseable parts
/// are skipped; a missing or empty value sums to zero.
pub fn sum_pipe_delimited(value: Option<&str>) -> f64 {
    value
        .unwrap_or_default()
        .split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.replace('.', "").replace(',', ".").parse::<f64>().ok())
        .sum()
}

/// Applies gold-layer curation to silver rows
#[derive(Debug, Clone, Default)]
pub struct Curator {
    config: CurationConfig,
}

impl Curator {
    /// Create a curator
    pub fn new(config: CurationConfig) -> Self {
        Self { config }
    }

    /// Settings in use
    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    /// Curate a whole batch
    ///
    /// A monetary column present in any row is present in every row, so
    /// rows merged from snapshots with different boards still sum to zero.
    pub fn curate(&self, batch: &TabularBatch) -> TabularBatch {
        let mut curated =
            TabularBatch::new(batch.rows.iter().map(|row| self.curate_row(row)).collect());

        let columns = curated.columns();
        for column in &self.config.monetary_columns {
            if !columns.contains(column) {
                continue;
            }
            for row in &mut curated.rows {
                if !row.contains(column) {
                    row.set(column, Cell::Number(0.0));
                }
            }
        }
        curated
    }

    /// Curate one row
    pub fn curate_row(&self, row: &Row) -> Row {
        let mut keyed = row.clone();
        let id = self
            .business_key(row)
            .map_or(Cell::Null, |key| Cell::Text(stable_id(key).to_string()));
        keyed.set(PROJECT_ID, id);

        let mut curated = keyed
            .into_iter()
            .fold(Row::new(), |mut acc, (name, cell)| {
                acc.insert_unique(&normalize_column_name(&name), cell);
                acc
            });

        for column in &self.config.monetary_columns {
            let slot = curated
                .iter_mut()
                .find(|(name, _)| *name == column.as_str());
            if let Some((_, cell)) = slot {
                *cell = Cell::Number(sum_pipe_delimited(monetary_text(cell).as_deref()));
            }
        }

        curated
    }

    /// Project code if present and non-empty, else the item name
    fn business_key<'a>(&self, row: &'a Row) -> Option<&'a str> {
        let project_code = self.config.project_code_columns.iter().find_map(|wanted| {
            row.iter()
                .find(|(name, _)| normalize_column_name(name) == *wanted)
                .and_then(|(_, cell)| cell.as_text())
                .filter(|code| !code.trim().is_empty())
        });

        project_code.or_else(|| row.get_text(ITEM_NAME))
    }
}

fn monetary_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(n) => Some(n.to_string().replace('.', ",")),
    }
}
