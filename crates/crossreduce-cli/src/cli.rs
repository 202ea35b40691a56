//! Command-line interface for the crossreduce timing harness

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use crossreduce::logging::init_logging;

use crate::harness;

/// crossreduce - standalone timing harness for the crossing-reduction engine
#[derive(Parser)]
#[command(name = "crossreduce")]
#[command(about = "Run the crossreduce ordering engine against a file of packed rank/edge data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reorder the ranks described by a file once and print the elapsed time.
    Run {
        /// Path to a comma-separated rank/edge data file.
        path: PathBuf,
    },
    /// Reorder the same input `--repeat` times and report min/mean/max timings.
    Bench {
        /// Path to a comma-separated rank/edge data file.
        path: PathBuf,

        /// Number of repetitions.
        #[arg(long, default_value_t = 10)]
        repeat: u32,
    },
}

pub struct App;

impl App {
    pub fn new() -> Self {
        App
    }

    pub fn run(&mut self, cli: Cli) -> Result<()> {
        let _ = init_logging(Some(cli.log_level.as_str()), Some(cli.log_format.as_str()));

        match cli.command {
            Commands::Run { path } => {
                let ms = harness::run_once(&path).map_err(|e| anyhow!(e))?;
                println!("{:.3} ms", ms);
                Ok(())
            }
            Commands::Bench { path, repeat } => {
                let (min, mean, max) = harness::run_bench(&path, repeat).map_err(|e| anyhow!(e))?;
                println!("min: {:.3} ms, mean: {:.3} ms, max: {:.3} ms", min, mean, max);
                Ok(())
            }
        }
    }
}
