//! CLI module
//!
//! Command-line interface for running the pipeline.
//!
//! # Commands
//!
//! - `run` - Normalize the source and append partitioned Parquet
//! - `transform` - Normalize one local file and print the result
//! - `validate` - Check a pipeline config file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
