// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WatchError};
use crate::watch::ignore::build_globset;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.ignore))
    }
}

pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_buffers(cfg)?;
    validate_ignore_patterns(cfg)?;
    Ok(())
}

fn validate_buffers(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.backend_buffer == 0 {
        return Err(WatchError::ConfigError(
            "[watch].backend_buffer must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.watch.output_buffer == 0 {
        return Err(WatchError::ConfigError(
            "[watch].output_buffer must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_ignore_patterns(cfg: &RawConfigFile) -> Result<()> {
    for pattern in cfg.ignore.patterns.iter() {
        if pattern.trim().is_empty() {
            return Err(WatchError::ConfigError(
                "[ignore].patterns must not contain empty patterns".to_string(),
            ));
        }
    }

    build_globset(&cfg.ignore.patterns)
        .map_err(|e| WatchError::ConfigError(format!("[ignore].patterns: {e:#}")))?;

    Ok(())
}
