//! Source API module
//!
//! Item model and the monday.com GraphQL client that serves item pages.

mod client;
mod types;

pub use client::{parse_items_page, MondayClient, DEFAULT_ENDPOINT, ITEMS_PAGE_QUERY};
pub use types::{ColumnMeta, ColumnValue, Item, ItemsPage};
