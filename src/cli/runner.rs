//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::decode::{build_decoder, DecoderFormat};
use crate::error::{Error, Result};
use crate::output::{batch_to_json, listings_to_batch};
use crate::pipeline::{Pipeline, RunOptions};
use crate::transform::normalize_batch;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
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
        match &self.cli.command {
            Commands::Run {
                config,
                source,
                destination,
                format,
                dry_run,
            } => {
                let config = Self::build_run_config(
                    config.as_deref(),
                    source.as_deref(),
                    destination.as_deref(),
                    *format,
                )?;
                self.run_pipeline(&config, *dry_run).await
            }
            Commands::Transform {
                file,
                format,
                pretty,
            } => self.transform(file, *format, *pretty),
            Commands::Validate { config } => self.validate(config),
        }
    }

    /// Merge the config file (if any) with command-line overrides
    fn build_run_config(
        path: Option<&Path>,
        source: Option<&str>,
        destination: Option<&str>,
        format: Option<DecoderFormat>,
    ) -> Result<PipelineConfig> {
        let mut config = match path {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(source) = source {
            config = config.with_source(source);
        }
        if let Some(destination) = destination {
            config = config.with_destination(destination);
        }
        if let Some(format) = format {
            config = config.with_format(format);
        }

        Ok(config)
    }

    /// Run the full pipeline and print the run summary
    async fn run_pipeline(&self, config: &PipelineConfig, dry_run: bool) -> Result<()> {
        let options = RunOptions::new().with_dry_run(dry_run);
        let mut pipeline = Pipeline::from_config(config, options)?;

        info!(
            source = %config.source.path,
            destination = %config.destination.path,
            dry_run,
            "Starting pipeline run"
        );
        let stats = pipeline.run().await?;

        self.output_message(&json!({
            "type": "RUN_SUMMARY",
            "summary": stats,
        }));
        Ok(())
    }

    /// Normalize one local file and print each cleaned listing
    fn transform(&self, file: &Path, format: DecoderFormat, pretty: bool) -> Result<()> {
        let body = fs::read_to_string(file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: file.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let containers = build_decoder(format).decode(&body)?;
        let listings = normalize_batch(&containers)?;

        let batch = listings_to_batch(&listings, true)?;
        for row in batch_to_json(&batch)? {
            let line = if pretty {
                serde_json::to_string_pretty(&row)?
            } else {
                serde_json::to_string(&row)?
            };
            println!("{line}");
        }

        Ok(())
    }

    /// Load and validate a config file
    fn validate(&self, path: &Path) -> Result<()> {
        let config = PipelineConfig::from_file(path)?;
        config.validate()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Pipeline config '{}' is valid: {} -> {}",
                    path.display(),
                    config.source.path,
                    config.destination.path
                )
            }
        }));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        if self.cli.verbose {
            println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        } else {
            println!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
    }
}
