//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::layout::Period;
use crate::pipeline::{Pipeline, RunReport};
use serde_json::{json, Value};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = PipelineConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Validate => {
                info!("Configuration is valid");
                self.output_message(&serde_json::to_value(&config)?);
                Ok(())
            }
            Commands::Run => {
                let report = Pipeline::from_config(config)?.run().await?;
                self.output_report(&report)
            }
            Commands::Extract => {
                let report = Pipeline::from_config(config)?.extract().await?;
                self.output_report(&report)
            }
            Commands::Silver { period } => {
                let period = parse_period(period.as_deref())?;
                let report = Pipeline::from_config(config)?.silver(period).await?;
                self.output_report(&report)
            }
            Commands::Gold { period } => {
                let period = parse_period(period.as_deref())?;
                let report = Pipeline::from_config(config)?.rebuild_gold(period).await?;
                self.output_report(&report)
            }
            Commands::Pending { period } => {
                let period = parse_period(period.as_deref())?;
                let pending = Pipeline::from_config(config)?.pending(period).await?;
                let boards: serde_json::Map<String, Value> = pending
                    .into_iter()
                    .map(|(board, stamps)| {
                        let stamps: Vec<String> = stamps.iter().map(ToString::to_string).collect();
                        (board, json!(stamps))
                    })
                    .collect();
                self.output_message(&json!({ "pending": boards }));
                Ok(())
            }
        }
    }

    fn output_report(&self, report: &RunReport) -> Result<()> {
        self.output_message(&serde_json::to_value(report)?);
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn parse_period(period: Option<&str>) -> Result<Option<Period>> {
    period.map(Period::parse).transpose()
}
