// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `trackline`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "trackline",
    version,
    about = "Order the units of a dependency graph into rows with minimal crossing.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph description (TOML).
    ///
    /// Default: `Trackline.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Trackline.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TRACKLINE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, list units, but don't compute a layout.
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

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
