//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Extract, land bronze, diff silver, curate gold
//! - `extract` - Extract and land bronze only
//! - `silver` - Incremental bronze → silver pass
//! - `gold` - Rebuild gold from a period's silver batches
//! - `pending` - List bronze snapshots not yet in silver
//! - `validate` - Check and print the configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
