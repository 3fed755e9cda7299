// src/errors.rs

//! Crate-wide error types.
//!
//! Two channels exist on purpose: [`WatchError`] is the recoverable,
//! caller-facing error returned by setup operations, while [`ScopeFault`]
//! is an invariant breach that terminates the owning session worker and is
//! never handed back as a value.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid subpath {path:?}: {reason}")]
    InvalidSubpath { path: String, reason: String },

    #[error("Watch root does not exist: {0:?}")]
    RootNotFound(PathBuf),

    #[error("Subpath does not exist: {0:?}")]
    SubpathNotFound(PathBuf),

    #[error("Subpath is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Backend registration failed for {path:?}: {source}")]
    Registration {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A raw record resolved outside the watch root.
///
/// This is a backend contract violation. The session worker that observes
/// it panics with this value instead of dropping or misattributing the
/// record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("path {path:?} is outside of watch root {root:?}")]
pub struct ScopeFault {
    pub root: PathBuf,
    pub path: PathBuf,
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchError>;
