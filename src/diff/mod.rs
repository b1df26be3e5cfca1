//! Incremental bronze → silver
//!
//! # Overview
//!
//! [`IncrementalDiffer`] compares the stamps of bronze snapshots and silver
//! batches for one period and materializes only the difference. When
//! nothing is pending the result is [`DiffOutcome::NothingToDo`].

mod differ;
mod types;

pub use differ::IncrementalDiffer;
pub use types::DiffOutcome;
