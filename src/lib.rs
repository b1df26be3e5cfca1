// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # monday-datalake
//!
//! Incremental medallion pipeline for monday.com boards on object storage.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Rebuilds a board's full item set from the items-page API
//! - **Bronze Snapshots**: Raw item lists landed as JSON, one per run stamp
//! - **Incremental Silver**: Only snapshots without a silver batch are flattened
//! - **Curated Gold**: Normalized columns, summed monetary lists, stable `id_projeto`
//! - **Parquet Output**: Arrow RecordBatches encoded in memory and written to S3
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use monday_datalake::{Pipeline, PipelineConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::load(Some("pipeline.yaml".as_ref()))?;
//!     let report = Pipeline::from_config(config)?.run().await?;
//!     println!("gold: {:?}", report.gold_key);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Paginator   │──▶│    Bronze    │──▶│    Silver    │──▶│     Gold     │
//! │ items_page   │   │ monday_raw_* │   │monday_items_*│   │ monday_gold_*│
//! │ cursor loop  │   │    (JSON)    │   │  (Parquet)   │   │  (Parquet)   │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!                                         flatten + diff      curate
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with optional retry and rate limiting
pub mod http;

/// monday.com item model and GraphQL client
pub mod source;

/// Cursor pagination
pub mod pagination;

/// Record flattening and snapshot formats
pub mod flatten;

/// Object store access
pub mod store;

/// Stamps, periods and key layout
pub mod layout;

/// Arrow/Parquet output
pub mod output;

/// Incremental bronze → silver differ
pub mod diff;

/// Silver → gold curation
pub mod curate;

/// Pipeline configuration
pub mod config;

/// Pipeline orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use pipeline::{Pipeline, RunReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
