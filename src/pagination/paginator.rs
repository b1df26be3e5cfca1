//! Cursor paginator
//!
//! Drives a [`PageSource`] from the first page until the source returns a
//! null cursor.

use super::types::{Extraction, PageSource, PaginationState};
use crate::error::Result;
use tracing::{debug, info};

/// Default number of items requested per page
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

/// Cursor-based paginator
///
/// Terminates only on a null cursor. A source that never returns one loops
/// forever; bound the call with a timeout if that matters.
#[derive(Debug, Clone)]
pub struct CursorPaginator {
    /// Items requested per page
    pub page_limit: u32,
}

impl Default for CursorPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(page_limit: u32) -> Self {
        Self { page_limit }
    }

    /// Fetch every item of a board, in page order
    ///
    /// Any page failure fails the whole extraction; pages already fetched
    /// are discarded.
    pub async fn fetch_all<S>(&self, source: &S, board_id: &str) -> Result<Extraction>
    where
        S: PageSource + ?Sized,
    {
        let mut state = PaginationState::new();
        let mut items = Vec::new();

        info!("Starting extraction of board {board_id}");

        loop {
            debug!(
                "Fetching page {} of board {board_id} (cursor: {:?})",
                state.page + 1,
                state.cursor
            );

            let page = source
                .fetch_page(board_id, self.page_limit, state.cursor.as_deref())
                .await?;

            let count = page.items.len();
            items.extend(page.items);
            state.advance(count, page.cursor);

            debug!("Page {}: {count} items", state.page);

            if state.done {
                break;
            }
        }

        info!(
            "Extracted {} items from board {board_id} in {} pages",
            items.len(),
            state.page
        );

        Ok(Extraction {
            board_id: board_id.to_string(),
            items,
            state,
        })
    }
}
