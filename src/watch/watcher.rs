// src/watch/watcher.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::sink::{RecordSink, SessionSignals};
use crate::backend::{Backend, NotifyBackend};
use crate::errors::{Result, WatchError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::ignore::IgnoreFilter;
use crate::watch::scope::Scoper;
use crate::watch::session::{EventStream, SessionWorker};
use crate::watch::translate::Translator;

/// Default capacity of a session's intake queue.
pub const DEFAULT_BACKEND_BUFFER: usize = 500;

/// Default capacity of a session's output stream.
pub const DEFAULT_OUTPUT_BUFFER: usize = 64;

/// Per-watcher tunables, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Capacity of each session's intake queue. Offering a record to a full
    /// queue is what triggers overflow coalescing.
    pub backend_buffer: usize,
    /// Capacity of each session's output stream.
    pub output_buffer: usize,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            backend_buffer: DEFAULT_BACKEND_BUFFER,
            output_buffer: DEFAULT_OUTPUT_BUFFER,
        }
    }
}

impl WatchOptions {
    pub fn with_backend_buffer(mut self, backend_buffer: usize) -> Self {
        self.backend_buffer = backend_buffer;
        self
    }

    pub fn with_output_buffer(mut self, output_buffer: usize) -> Self {
        self.output_buffer = output_buffer;
        self
    }
}

/// Watches subtrees of one root directory.
///
/// Each [`Watcher::watch`] call creates an independent session with its own
/// intake queue, worker task and output stream.
pub struct Watcher {
    root: PathBuf,
    /// The root as given, when it is absolute and differs from `root`.
    root_alias: Option<PathBuf>,
    fs: Arc<dyn FileSystem>,
    backend: Arc<dyn Backend>,
    options: WatchOptions,
    next_session: AtomicU64,
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("root", &self.root)
            .field("root_alias", &self.root_alias)
            .field("backend", &self.backend)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Watcher {
    /// Watcher on the real filesystem, using `notify`.
    pub fn new(root: impl Into<PathBuf>, options: WatchOptions) -> Result<Self> {
        Self::with_parts(
            root,
            Arc::new(RealFileSystem),
            Arc::new(NotifyBackend::new()),
            options,
        )
    }

    /// Watcher with an explicit filesystem and backend.
    ///
    /// `root` must be an existing directory; it is canonicalized once so
    /// backend paths can be compared against a stable base.
    pub fn with_parts(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        backend: Arc<dyn Backend>,
        options: WatchOptions,
    ) -> Result<Self> {
        let root = root.into();
        if !fs.exists(&root) {
            return Err(WatchError::RootNotFound(root));
        }
        if !fs.is_dir(&root) {
            return Err(WatchError::NotADirectory(root));
        }
        let canonical = fs.canonicalize(&root)?;
        let root_alias = (root.is_absolute() && root != canonical).then_some(root);
        let root = canonical;

        // Zero-capacity channels are not a thing in tokio.
        let options = WatchOptions {
            backend_buffer: options.backend_buffer.max(1),
            output_buffer: options.output_buffer.max(1),
        };

        debug!(?root, ?root_alias, ?options, "watcher created");
        Ok(Self {
            root,
            root_alias,
            fs,
            backend,
            options,
            next_session: AtomicU64::new(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> WatchOptions {
        self.options
    }

    /// Start a watch session on `subpath` (relative to the root, `"."` for
    /// the root itself).
    ///
    /// Setup problems (bad or missing subpath, backend refusing the
    /// registration) are returned here and no session is created. Must be
    /// called from within a Tokio runtime.
    pub fn watch(
        &self,
        subpath: &str,
        filter: Arc<dyn IgnoreFilter>,
        cancel: CancellationToken,
        recursive: bool,
    ) -> Result<EventStream> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| WatchError::Other(anyhow::anyhow!("watch needs a Tokio runtime: {e}")))?;

        let mut scoper = Scoper::resolve(&self.root, subpath)?;
        if let Some(alias) = &self.root_alias {
            scoper = scoper.with_alias(alias);
        }
        let base = scoper.base().to_path_buf();
        if !self.fs.exists(&base) {
            return Err(WatchError::SubpathNotFound(base));
        }
        if !self.fs.is_dir(&base) {
            return Err(WatchError::NotADirectory(base));
        }

        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let (intake_tx, intake_rx) = mpsc::channel(self.options.backend_buffer);
        let (out_tx, out_rx) = mpsc::channel(self.options.output_buffer);
        let signals = Arc::new(SessionSignals::default());
        let normalized = scoper.subpath().to_string();

        let sink = RecordSink::new(
            id,
            Arc::new(scoper),
            filter,
            intake_tx,
            Arc::clone(&signals),
        );

        let registration = self
            .backend
            .register(&base, recursive, sink)
            .map_err(|source| WatchError::Registration {
                path: base.clone(),
                source,
            })?;

        let worker = SessionWorker {
            id,
            subpath: normalized.clone(),
            intake: intake_rx,
            out: out_tx,
            signals: Arc::clone(&signals),
            translator: Translator::new(self.backend.kind_table()),
            cancel,
            registration,
        };
        let handle = runtime.spawn(worker.run());

        info!(session = id, subpath = %normalized, recursive, "watching {:?}", base);
        Ok(EventStream::new(id, normalized, out_rx, signals, handle))
    }
}
