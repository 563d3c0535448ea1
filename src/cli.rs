// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskdag",
    version,
    about = "Inspect a task dependency plan: schedule, execution waves, critical path and stats.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the plan file (TOML).
    ///
    /// Default: `Taskdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Which part of the report to print.
    #[arg(long, value_enum, default_value_t = View::All)]
    pub view: View,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Report sections selectable with `--view`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Everything below.
    All,
    /// Only the tasks that can be assigned now, one per line.
    Ready,
    /// Topological order and ready/blocked/completed partition.
    Schedule,
    /// Execution waves.
    Waves,
    /// Longest dependency chain.
    CriticalPath,
    /// Aggregate metrics.
    Stats,
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

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
