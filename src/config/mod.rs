// src/config/mod.rs

//! Configuration loading and validation for treewatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate buffer sizes and ignore patterns (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path, parse_str,
    resolve_config,
};
pub use model::{ConfigFile, IgnoreSection, RawConfigFile, WatchSection};
pub use validate::validate_raw_config;
