//! Silver → gold curation
//!
//! # Overview
//!
//! [`Curator`] is pure: it derives the stable `id_projeto`, normalizes
//! column names and turns pipe-delimited monetary lists into float sums.

mod curator;
mod types;

pub use curator::{normalize_column_name, stable_id, sum_pipe_delimited, Curator};
pub use types::{
    CurationConfig, DEFAULT_MONETARY_COLUMNS, DEFAULT_PROJECT_CODE_COLUMNS, PROJECT_ID,
};

#[cfg(test)]
mod tests;
