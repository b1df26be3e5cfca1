//! Bronze → silver reshaping
//!
//! # Overview
//!
//! - [`flatten_item`] folds one item's self-describing column values into a
//!   flat [`Row`]
//! - [`format_snapshot`] detects the snapshot shape and flattens every item
//!   into a [`TabularBatch`]

mod flattener;
mod formatter;
mod types;

pub use flattener::{
    column_name, flatten_item, resolve_cell, MULTI_VALUE_SEPARATOR, UNNAMED_COLUMN,
};
pub use formatter::{format_snapshot, format_snapshot_bytes, SnapshotFormat};
pub use types::{Cell, ColumnKind, Row, TabularBatch, BOARD_ORIGIN, ITEM_ID, ITEM_NAME};
