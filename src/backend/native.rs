// src/backend/native.rs

//! OS-level backend built on `notify`'s recommended watcher.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Config, ErrorKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::backend::{Backend, RecordSink, Registration};
use crate::types::{NativeKind, RawRecord, RenameCapability};
use crate::watch::kinds::KindTable;

/// What to do with notify's `RenameMode::Both` events.
///
/// inotify and ReadDirectoryChangesW report each half of a rename on its
/// own (`From`, `To`) and inotify then repeats the pair as `Both`. Other
/// backends only ever send the paired form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairedRenames {
    /// Split `Both` into a `RenameFrom` and a `RenameTo` record.
    Expand,
    /// Drop `Both`; the halves were already delivered.
    Skip,
}

impl PairedRenames {
    pub fn for_platform() -> Self {
        if cfg!(any(target_os = "linux", target_os = "android", target_os = "windows")) {
            PairedRenames::Skip
        } else {
            PairedRenames::Expand
        }
    }
}

impl Default for PairedRenames {
    fn default() -> Self {
        Self::for_platform()
    }
}

#[derive(Debug, Clone)]
pub struct NotifyBackend {
    config: Config,
    table: KindTable,
    paired: PairedRenames,
}

impl Default for NotifyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyBackend {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            table: KindTable::for_platform(),
            paired: PairedRenames::for_platform(),
        }
    }

    pub fn with_paired_renames(mut self, paired: PairedRenames) -> Self {
        self.paired = paired;
        self
    }

    /// Replace the platform default rename handling.
    pub fn with_rename_capability(mut self, rename: RenameCapability) -> Self {
        self.table = KindTable::new(rename);
        self
    }

    pub fn with_kind_table(mut self, table: KindTable) -> Self {
        self.table = table;
        self
    }
}

impl Backend for NotifyBackend {
    fn register(&self, path: &Path, recursive: bool, sink: RecordSink) -> Result<Registration> {
        let session = sink.session();
        let paired = self.paired;

        // Called synchronously on notify's own thread.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match res {
                Ok(event) => forward_event(&sink, event, paired),
                Err(err) => forward_error(&sink, err),
            },
            self.config,
        )
        .context("creating notify watcher")?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(path, mode)
            .with_context(|| format!("watching {:?}", path))?;

        info!(session, ?path, recursive, "notify backend registered");
        Ok(Registration::new(watcher))
    }

    fn kind_table(&self) -> KindTable {
        self.table.clone()
    }
}

fn forward_event(sink: &RecordSink, event: notify::Event, paired: PairedRenames) {
    if event.need_rescan() {
        warn!(session = sink.session(), "backend dropped events; requesting rescan");
        sink.overflow();
    }

    for (path, kind) in split_event(&event, paired) {
        sink.push(RawRecord::new(path, kind));
    }
}

fn forward_error(sink: &RecordSink, err: notify::Error) {
    match err.kind {
        ErrorKind::PathNotFound
        | ErrorKind::WatchNotFound
        | ErrorKind::InvalidConfig(_)
        | ErrorKind::MaxFilesWatch => {
            sink.fail(format!("{err} (paths: {:?})", err.paths));
        }
        _ => {
            warn!(session = sink.session(), error = %err, "transient file watch error");
        }
    }
}

/// One `(path, kind)` pair per path carried by a notify event.
///
/// A paired rename yields nothing under [`PairedRenames::Skip`].
pub fn split_event(event: &notify::Event, paired: PairedRenames) -> Vec<(PathBuf, NativeKind)> {
    use notify::EventKind as E;

    if let E::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        if paired == PairedRenames::Skip {
            debug!(paths = ?event.paths, "paired rename already reported by halves");
            return Vec::new();
        }
        // notify reports [from, to].
        return event
            .paths
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let kind = if i == 0 {
                    NativeKind::RenameFrom
                } else {
                    NativeKind::RenameTo
                };
                (path.clone(), kind)
            })
            .collect();
    }

    let kind = match event.kind {
        E::Create(_) => NativeKind::Create,
        E::Remove(_) => NativeKind::Remove,
        E::Modify(ModifyKind::Name(RenameMode::From)) => NativeKind::RenameFrom,
        E::Modify(ModifyKind::Name(RenameMode::To)) => NativeKind::RenameTo,
        E::Modify(ModifyKind::Name(_)) => NativeKind::Rename,
        E::Modify(ModifyKind::Metadata(_)) => NativeKind::Metadata,
        E::Modify(_) => NativeKind::Write,
        E::Access(AccessKind::Close(AccessMode::Write)) => NativeKind::Write,
        E::Access(_) => NativeKind::Access,
        E::Any | E::Other => NativeKind::Other,
    };

    if event.paths.is_empty() {
        debug!(kind = ?event.kind, "notify event without paths");
    }

    event.paths.iter().map(|path| (path.clone(), kind)).collect()
}
