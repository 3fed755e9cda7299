// src/config/model.rs

use serde::Deserialize;

use crate::types::RenameCapability;
use crate::watch::{DEFAULT_BACKEND_BUFFER, DEFAULT_OUTPUT_BUFFER, WatchOptions};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// backend_buffer = 500
/// output_buffer = 64
/// recursive = true
/// rename = "auto"
///
/// [ignore]
/// patterns = ["target", "**/*.tmp"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub ignore: IgnoreSection,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    ignore: IgnoreSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, ignore: IgnoreSection) -> Self {
        Self { watch, ignore }
    }

    pub fn watch_section(&self) -> &WatchSection {
        &self.watch
    }

    pub fn ignore_section(&self) -> &IgnoreSection {
        &self.ignore
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            backend_buffer: self.watch.backend_buffer,
            output_buffer: self.watch.output_buffer,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(WatchSection::default(), IgnoreSection::default())
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Capacity of each session's intake queue; exceeding it coalesces the
    /// burst into a single root event.
    #[serde(default = "default_backend_buffer")]
    pub backend_buffer: usize,

    /// Capacity of each session's output stream.
    #[serde(default = "default_output_buffer")]
    pub output_buffer: usize,

    /// Watch subdirectories too.
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// `"auto"`, `"distinguishes"`, `"remove"` or `"non-remove"`.
    #[serde(default)]
    pub rename: RenameCapability,
}

fn default_backend_buffer() -> usize {
    DEFAULT_BACKEND_BUFFER
}

fn default_output_buffer() -> usize {
    DEFAULT_OUTPUT_BUFFER
}

fn default_recursive() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            backend_buffer: default_backend_buffer(),
            output_buffer: default_output_buffer(),
            recursive: default_recursive(),
            rename: RenameCapability::default(),
        }
    }
}

/// `[ignore]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgnoreSection {
    /// Globs relative to the watch root. A match on a directory also
    /// ignores everything below it.
    #[serde(default)]
    pub patterns: Vec<String>,
}
