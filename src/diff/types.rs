//! Differ result types

use crate::flatten::TabularBatch;
use crate::layout::Stamp;

/// Outcome of one incremental bronze → silver pass
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// No bronze snapshot was pending
    NothingToDo,
    /// Pending snapshots were flattened and written to silver
    Processed {
        /// Stamps written, ascending
        stamps: Vec<Stamp>,
        /// Concatenation of the new batches, in stamp order
        batch: TabularBatch,
    },
}

impl DiffOutcome {
    /// Did this pass write anything?
    pub fn is_nothing_to_do(&self) -> bool {
        matches!(self, Self::NothingToDo)
    }

    /// Stamps written by this pass
    pub fn stamps(&self) -> &[Stamp] {
        match self {
            Self::NothingToDo => &[],
            Self::Processed { stamps, .. } => stamps,
        }
    }

    /// New rows, if any
    pub fn into_batch(self) -> Option<TabularBatch> {
        match self {
            Self::NothingToDo => None,
            Self::Processed { batch, .. } => Some(batch),
        }
    }
}
