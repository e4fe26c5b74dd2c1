//! CLI commands and argument parsing

use crate::config::PipelineConfig;
use crate::decode::DecoderFormat;
use crate::types::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Job listing ETL: raw JSON feeds to Hive-partitioned Parquet
#[derive(Parser, Debug)]
#[command(name = "jobfeed-etl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize every file in the source and append it to the destination
    Run {
        /// Pipeline configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Source location (local path or cloud URL)
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
        #[arg(long)]
        source: Option<String>,

        /// Destination location (local path or cloud URL)
        #[arg(long)]
        destination: Option<String>,

        /// Input file layout
        #[arg(long)]
        format: Option<DecoderFormat>,

        /// Normalize and partition without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Normalize one local file and print the cleaned listings
    Transform {
        /// Raw listing file
        file: PathBuf,

        /// Input file layout
        #[arg(long, default_value = "auto")]
        format: DecoderFormat,

        /// Pretty-print each listing
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a pipeline configuration file
    Validate {
        /// Pipeline configuration file (YAML)
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Cli {
    /// Config file named on the command line, if any
    pub fn config_path(&self) -> Option<&PathBuf> {
        match &self.command {
            Commands::Run { config, .. } => config.as_ref(),
            Commands::Validate { config } => Some(config),
            Commands::Transform { .. } => None,
        }
    }

    /// Default log level before `RUST_LOG` is applied
    ///
    /// `--verbose` wins, then the config file's `log_level`.
    pub fn default_log_level(&self) -> LogLevel {
        if self.verbose {
            return LogLevel::Debug;
        }
        self.config_path()
            .and_then(|path| PipelineConfig::from_file(path).ok())
            .map(|config| config.log_level)
            .unwrap_or_default()
    }
}
