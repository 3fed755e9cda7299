// src/watch/session.rs

//! The async shell around [`Translator`]: one worker task per session.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::backend::Registration;
use crate::backend::sink::SessionSignals;
use crate::types::Event;
use crate::watch::translate::{ScopedRecord, Translator};

/// Why a session worker stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    Cancelled,
    ConsumerGone,
    BackendFailed(String),
    BackendClosed,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::Cancelled => f.write_str("cancelled"),
            SessionEnd::ConsumerGone => f.write_str("event stream dropped"),
            SessionEnd::BackendFailed(reason) => write!(f, "backend failed: {reason}"),
            SessionEnd::BackendClosed => f.write_str("backend stopped delivering"),
        }
    }
}

enum Step {
    End(SessionEnd),
    Signal,
    Record(Option<ScopedRecord>),
}

/// Owns the intake queue, the translator and the backend registration for
/// the lifetime of one session.
pub(crate) struct SessionWorker {
    pub(crate) id: u64,
    pub(crate) subpath: String,
    pub(crate) intake: mpsc::Receiver<ScopedRecord>,
    pub(crate) out: mpsc::Sender<Event>,
    pub(crate) signals: Arc<SessionSignals>,
    pub(crate) translator: Translator,
    pub(crate) cancel: CancellationToken,
    pub(crate) registration: Registration,
}

impl SessionWorker {
    pub(crate) async fn run(mut self) {
        info!(session = self.id, subpath = %self.subpath, "watch session started");

        let end = loop {
            if let Err(end) = self.handle_signals().await {
                break end;
            }

            let step = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Step::End(SessionEnd::Cancelled),
                _ = self.out.closed() => Step::End(SessionEnd::ConsumerGone),
                _ = self.signals.notified() => Step::Signal,
                record = self.intake.recv() => Step::Record(record),
            };

            match step {
                Step::End(end) => break end,
                Step::Signal => continue,
                Step::Record(None) => break SessionEnd::BackendClosed,
                Step::Record(Some(record)) => {
                    if let Some(event) = self.translator.on_record(record) {
                        if let Err(end) = self.deliver(event).await {
                            break end;
                        }
                    }
                }
            }
        };

        self.translator.terminate();
        self.intake.close();
        drop(self.registration);

        match &end {
            SessionEnd::BackendFailed(reason) => {
                error!(session = self.id, %reason, "watch session terminated by backend failure");
            }
            SessionEnd::BackendClosed => {
                warn!(session = self.id, "backend closed the intake queue; watch session terminated");
            }
            SessionEnd::Cancelled | SessionEnd::ConsumerGone => {
                debug!(session = self.id, reason = %end, "watch session stopped");
            }
        }
        info!(session = self.id, "watch session finished");
    }

    /// Act on out-of-band signals. Scope faults never return.
    async fn handle_signals(&mut self) -> Result<(), SessionEnd> {
        if let Some(fault) = self.signals.take_fault() {
            error!(session = self.id, %fault, "record outside of watch root");
            panic!("watch session {}: {fault}", self.id);
        }

        if let Some(reason) = self.signals.take_failure() {
            return Err(SessionEnd::BackendFailed(reason));
        }

        if self.signals.take_reset() {
            self.translator.reset();
        }

        if self.signals.take_overflow() {
            let mut discarded = 0usize;
            while self.intake.try_recv().is_ok() {
                discarded += 1;
            }
            debug!(session = self.id, discarded, "drained intake queue after overflow");

            if let Some(event) = self.translator.on_overflow() {
                self.deliver(event).await?;
            }
        }

        Ok(())
    }

    /// Send one event, giving up if the session is cancelled meanwhile.
    async fn deliver(&mut self, event: Event) -> Result<(), SessionEnd> {
        debug!(session = self.id, %event, "emitting event");
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SessionEnd::Cancelled),
            res = self.out.send(event) => res.map_err(|_| SessionEnd::ConsumerGone),
        }
    }
}

/// Consumer side of a watch session.
///
/// Events arrive in intake order. The stream ends (`recv` returns `None`)
/// once the session is cancelled, the backend fails, or the worker faults.
pub struct EventStream {
    id: u64,
    subpath: String,
    rx: mpsc::Receiver<Event>,
    signals: Arc<SessionSignals>,
    worker: JoinHandle<()>,
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("id", &self.id)
            .field("subpath", &self.subpath)
            .finish_non_exhaustive()
    }
}

impl EventStream {
    pub(crate) fn new(
        id: u64,
        subpath: String,
        rx: mpsc::Receiver<Event>,
        signals: Arc<SessionSignals>,
        worker: JoinHandle<()>,
    ) -> Self {
        Self {
            id,
            subpath,
            rx,
            signals,
            worker,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Normalized subpath this session watches.
    pub fn subpath(&self) -> &str {
        &self.subpath
    }

    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Event, TryRecvError> {
        self.rx.try_recv()
    }

    /// Resume per-path events after an overflow.
    ///
    /// Call this once the subtree has been rescanned in response to the
    /// root event. Has no effect while the session is not overflowed.
    pub fn reset_overflow(&self) {
        self.signals.request_reset();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Close the stream and wait for the worker.
    ///
    /// A worker that hit a scope fault reports it here as a panicked
    /// [`JoinError`].
    pub async fn join(self) -> Result<(), JoinError> {
        let Self { rx, worker, .. } = self;
        drop(rx);
        worker.await
    }
}
