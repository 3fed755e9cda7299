// src/watch/kinds.rs

//! Translation table from native backend kinds to the emitted vocabulary.

use std::collections::HashMap;

use crate::types::{EventKind, NativeKind, RenameCapability};

/// Maps each [`NativeKind`] to an [`EventKind`], or to `None` for kinds that
/// do not represent a change (read-only access).
///
/// The table is supplied by the backend, so a backend that knows better can
/// override single entries without touching the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindTable {
    rename: RenameCapability,
    overrides: HashMap<NativeKind, Option<EventKind>>,
}

impl KindTable {
    pub fn new(rename: RenameCapability) -> Self {
        Self {
            rename,
            overrides: HashMap::new(),
        }
    }

    /// Table for the platform's recommended backend.
    pub fn for_platform() -> Self {
        Self::new(RenameCapability::for_platform())
    }

    /// Override the classification of a single native kind.
    pub fn with(mut self, native: NativeKind, kind: Option<EventKind>) -> Self {
        self.overrides.insert(native, kind);
        self
    }

    pub fn rename_capability(&self) -> RenameCapability {
        self.rename
    }

    pub fn classify(&self, native: NativeKind) -> Option<EventKind> {
        if let Some(kind) = self.overrides.get(&native) {
            return *kind;
        }

        match native {
            NativeKind::Create
            | NativeKind::Write
            | NativeKind::Metadata
            | NativeKind::Other => Some(EventKind::NonRemove),
            NativeKind::Remove => Some(EventKind::Remove),
            NativeKind::RenameFrom => Some(EventKind::Remove),
            NativeKind::RenameTo => Some(EventKind::NonRemove),
            NativeKind::Rename => match self.rename {
                RenameCapability::Distinguishes => Some(EventKind::Remove),
                RenameCapability::Indistinct(kind) => Some(kind),
            },
            NativeKind::Access => None,
        }
    }
}

impl Default for KindTable {
    fn default() -> Self {
        Self::for_platform()
    }
}
