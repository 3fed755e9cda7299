// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `treewatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "treewatch",
    version,
    about = "Print normalized change events for a directory subtree.",
    long_about = None
)]
pub struct CliArgs {
    /// Subtree to watch, relative to `--root`.
    #[arg(value_name = "SUBPATH", default_value = ".")]
    pub subpath: String,

    /// Watch root. Event names are relative to it.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: String,

    /// Path to the config file (TOML).
    ///
    /// If omitted, `Treewatch.toml` in the current working directory is used
    /// when present, built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Extra ignore glob, relative to the root. May be repeated.
    #[arg(long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Only watch the subpath itself, not its subdirectories.
    #[arg(long)]
    pub no_recursive: bool,

    /// Override `[watch].backend_buffer`.
    #[arg(long, value_name = "N")]
    pub backend_buffer: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TREEWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective configuration and exit without watching.
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
