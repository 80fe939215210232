// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::engine::Strategy;

/// Command-line arguments for `logflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "logflow",
    version,
    about = "Run a task graph whose progress lives in an append-only log.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the flow file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Logflow.toml")]
    pub config: String,

    /// Scheduling strategy.
    #[arg(long, value_enum, default_value_t = Strategy::Incremental)]
    pub strategy: Strategy,

    /// Stop after this many executor steps, even if the run has not settled.
    #[arg(long, value_name = "N")]
    pub steps: Option<usize>,

    /// With the push strategy, continue from the tasks the log has no value
    /// for instead of starting over at the sources.
    #[arg(long)]
    pub resume: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LOGFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse and validate, print the graph, but don't run any task.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
