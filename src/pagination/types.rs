//! Pagination types and traits
//!
//! Defines the page-fetch seam and the state tracked while walking pages.

use crate::error::Result;
use crate::source::{Item, ItemsPage};
use async_trait::async_trait;

/// Source of cursor-paginated item pages
///
/// One call fetches one page of `board_id` starting at `cursor` (or the
/// first page when `cursor` is `None`).
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a single page
    async fn fetch_page(
        &self,
        board_id: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<ItemsPage>;
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages fetched so far
    pub page: u32,
    /// Current cursor value
    pub cursor: Option<String>,
    /// Total items fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page and move the cursor
    pub fn advance(&mut self, items: usize, next_cursor: Option<String>) {
        self.page += 1;
        self.total_fetched += items as u64;
        self.done = next_cursor.is_none();
        self.cursor = next_cursor;
    }
}

/// Complete item set extracted from one board
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Board the items belong to
    pub board_id: String,
    /// Items in page order
    pub items: Vec<Item>,
    /// Final pagination state
    pub state: PaginationState,
}

impl Extraction {
    /// Number of pages fetched
    pub fn pages(&self) -> u32 {
        self.state.page
    }
}
