// src/backend/manual.rs

//! A backend driven by hand.
//!
//! Registrations are remembered together with their sinks so callers
//! (tests, embedders with their own event source) can push records
//! directly. Nothing touches the OS.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::backend::{Backend, RecordSink, Registration};
use crate::types::RawRecord;
use crate::watch::kinds::KindTable;

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    entries: Vec<ManualEntry>,
    reject: Option<String>,
}

#[derive(Debug)]
struct ManualEntry {
    id: u64,
    path: PathBuf,
    recursive: bool,
    sink: RecordSink,
}

#[derive(Debug, Clone, Default)]
pub struct ManualBackend {
    state: Arc<Mutex<ManualState>>,
    table: KindTable,
}

impl ManualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind_table(mut self, table: KindTable) -> Self {
        self.table = table;
        self
    }

    /// Make every following registration fail with `reason`.
    pub fn reject_registrations(&self, reason: impl Into<String>) {
        self.lock().reject = Some(reason.into());
    }

    /// Sink of the most recent live registration.
    pub fn last_sink(&self) -> Option<RecordSink> {
        self.lock().entries.last().map(|e| e.sink.clone())
    }

    /// Sinks of all live registrations, oldest first.
    pub fn sinks(&self) -> Vec<RecordSink> {
        self.lock().entries.iter().map(|e| e.sink.clone()).collect()
    }

    /// Registered `(path, recursive)` pairs, oldest first.
    pub fn registrations(&self) -> Vec<(PathBuf, bool)> {
        self.lock()
            .entries
            .iter()
            .map(|e| (e.path.clone(), e.recursive))
            .collect()
    }

    /// Deliver a record to every live registration.
    pub fn push(&self, record: RawRecord) {
        for sink in self.sinks() {
            sink.push(record.clone());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Backend for ManualBackend {
    fn register(&self, path: &Path, recursive: bool, sink: RecordSink) -> Result<Registration> {
        let mut state = self.lock();
        if let Some(reason) = &state.reject {
            return Err(anyhow!("{reason}"));
        }

        let id = state.next_id;
        state.next_id += 1;
        state.entries.push(ManualEntry {
            id,
            path: path.to_path_buf(),
            recursive,
            sink,
        });
        debug!(id, ?path, recursive, "manual backend registered");

        Ok(Registration::new(ManualGuard {
            id,
            state: Arc::clone(&self.state),
        }))
    }

    fn kind_table(&self) -> KindTable {
        self.table.clone()
    }
}

/// Removes its entry when the owning session goes away.
struct ManualGuard {
    id: u64,
    state: Arc<Mutex<ManualState>>,
}

impl Drop for ManualGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.retain(|e| e.id != self.id);
    }
}
