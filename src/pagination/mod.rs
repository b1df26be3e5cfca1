//! Pagination module
//!
//! # Overview
//!
//! Reconstructs the full item set of a board from a cursor-paginated API.
//! The page fetch is abstracted behind [`PageSource`] so the loop can run
//! against the live GraphQL client or a fixture.

mod paginator;
mod types;

pub use paginator::{CursorPaginator, DEFAULT_PAGE_LIMIT};
pub use types::{Extraction, PageSource, PaginationState};

#[cfg(test)]
mod tests;
