// src/backend/mod.rs

//! Raw event sources.
//!
//! A [`Backend`] registers a directory with some notification mechanism and
//! pushes whatever it observes into the [`RecordSink`] of the session that
//! asked. It also supplies the [`KindTable`] describing how its native kinds
//! (renames in particular) should be read.

pub mod manual;
pub mod native;
pub mod sink;

use std::fmt::Debug;
use std::path::Path;

use anyhow::Result;

use crate::watch::kinds::KindTable;

pub use manual::ManualBackend;
pub use native::{NotifyBackend, PairedRenames};
pub use sink::RecordSink;

pub trait Backend: Send + Sync + Debug {
    /// Start delivering records for `path` (recursively or not) into `sink`.
    ///
    /// Delivery stops when the returned [`Registration`] is dropped.
    fn register(&self, path: &Path, recursive: bool, sink: RecordSink) -> Result<Registration>;

    /// How this backend's native kinds map onto emitted events.
    fn kind_table(&self) -> KindTable;
}

/// Keeps a backend registration alive. Dropping it unregisters.
pub struct Registration {
    _guard: Box<dyn Send>,
}

impl Registration {
    pub fn new(guard: impl Send + 'static) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").finish()
    }
}
