//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// monday.com datalake pipeline
#[derive(Parser, Debug)]
#[command(name = "monday-datalake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format of the run report
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract, land bronze, diff silver and curate gold
    Run,

    /// Extract and land bronze snapshots only
    Extract,

    /// Flatten pending bronze snapshots into silver
    Silver {
        /// Period to process (YYYYMM, default: current month)
        #[arg(long)]
        period: Option<String>,
    },

    /// Rebuild gold from every silver batch of a period
    Gold {
        /// Period to rebuild (YYYYMM, default: current month)
        #[arg(long)]
        period: Option<String>,
    },

    /// List bronze snapshots not yet in silver
    Pending {
        /// Period to inspect (YYYYMM, default: current month)
        #[arg(long)]
        period: Option<String>,
    },

    /// Validate the configuration and print it
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
