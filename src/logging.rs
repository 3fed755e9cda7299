// src/logging.rs

//! `tracing` subscriber setup for the `treewatch` binary.
//!
//! Filter resolution:
//! 1. `--log-level` wins and applies to every target.
//! 2. Otherwise `TREEWATCH_LOG`, in `EnvFilter` directive syntax
//!    (`debug`, `treewatch::watch=trace,notify=warn`, ...).
//! 3. Otherwise `info`.
//!
//! Everything goes to stderr; stdout carries one event per line and nothing
//! else.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "TREEWATCH_LOG";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(lvl) => EnvFilter::new(Level::from(lvl).as_str()),
        None => match std::env::var(LOG_ENV) {
            Ok(directives) if !directives.trim().is_empty() => match parse_level_str(&directives) {
                Some(level) => EnvFilter::new(level.as_str()),
                None => EnvFilter::try_new(&directives)
                    .with_context(|| format!("invalid {LOG_ENV} value {directives:?}"))?,
            },
            _ => EnvFilter::new("info"),
        },
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Lenient single-level parser (`"Warning"` is accepted as `WARN`).
pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
