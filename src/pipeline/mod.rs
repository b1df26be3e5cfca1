//! Pipeline orchestration
//!
//! # Overview
//!
//! [`Pipeline`] wires the paginator, the blob store, the incremental differ
//! and the curator together. Each command returns a [`RunReport`].
//!
//! With several boards configured, each board's bronze and silver files go
//! under `{prefix}/{board}/` and silver rows are tagged with `board_origem`.

mod orchestrator;
mod types;

pub use orchestrator::Pipeline;
pub use types::RunReport;
