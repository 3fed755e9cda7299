// src/backend/sink.rs

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{futures::Notified, Notify};
use tracing::{debug, trace};

use crate::errors::ScopeFault;
use crate::types::RawRecord;
use crate::watch::ignore::IgnoreFilter;
use crate::watch::scope::Scoper;
use crate::watch::translate::ScopedRecord;

/// Out-of-band signals from the backend side (and the consumer) to a
/// session worker.
///
/// These never travel through the intake queue, so a full queue cannot
/// swallow them.
#[derive(Debug, Default)]
pub(crate) struct SessionSignals {
    overflowed: AtomicBool,
    reset_requested: AtomicBool,
    fault: Mutex<Option<ScopeFault>>,
    failure: Mutex<Option<String>>,
    notify: Notify,
}

impl SessionSignals {
    pub(crate) fn notified(&self) -> Notified<'_> {
        self.notify.notified()
    }

    pub(crate) fn raise_overflow(&self) {
        self.overflowed.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    pub(crate) fn take_overflow(&self) -> bool {
        self.overflowed.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
        self.notify.notify_one();
    }

    pub(crate) fn take_reset(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn raise_fault(&self, fault: ScopeFault) {
        let mut slot = self.fault.lock().unwrap_or_else(|e| e.into_inner());
        // Keep the first one; later faults add nothing.
        if slot.is_none() {
            *slot = Some(fault);
        }
        drop(slot);
        self.notify.notify_one();
    }

    pub(crate) fn take_fault(&self) -> Option<ScopeFault> {
        self.fault.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    pub(crate) fn raise_failure(&self, reason: String) {
        let mut slot = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(reason);
        }
        drop(slot);
        self.notify.notify_one();
    }

    pub(crate) fn take_failure(&self) -> Option<String> {
        self.failure.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

/// Entry point through which a backend hands raw records to one session.
///
/// Each pushed record is scoped, checked against the watched subpath and
/// the ignore filter, and only then offered to the bounded intake queue.
/// A record the queue cannot take turns into an overflow signal.
///
/// Cheap to clone; safe to use from any thread.
#[derive(Clone)]
pub struct RecordSink {
    session: u64,
    scoper: Arc<Scoper>,
    filter: Arc<dyn IgnoreFilter>,
    intake: mpsc::Sender<ScopedRecord>,
    signals: Arc<SessionSignals>,
}

impl fmt::Debug for RecordSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSink")
            .field("session", &self.session)
            .field("base", &self.scoper.base())
            .finish_non_exhaustive()
    }
}

impl RecordSink {
    pub(crate) fn new(
        session: u64,
        scoper: Arc<Scoper>,
        filter: Arc<dyn IgnoreFilter>,
        intake: mpsc::Sender<ScopedRecord>,
        signals: Arc<SessionSignals>,
    ) -> Self {
        Self {
            session,
            scoper,
            filter,
            intake,
            signals,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Hand one raw record to the session.
    pub fn push(&self, record: RawRecord) {
        let name = match self.scoper.relativize(&record.path) {
            Ok(name) => name,
            Err(fault) => {
                self.signals.raise_fault(fault);
                return;
            }
        };

        if !self.scoper.contains(&name) {
            debug!(
                session = self.session,
                name = %name,
                subpath = %self.scoper.subpath(),
                "record outside of watched subpath; dropping"
            );
            return;
        }

        if self.filter.should_ignore(&name) {
            debug!(session = self.session, name = %name, "ignored path; dropping");
            return;
        }

        match self.intake.try_send(ScopedRecord::new(name, record.kind)) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                trace!(session = self.session, name = %dropped.name, "intake queue full");
                self.signals.raise_overflow();
            }
            Err(TrySendError::Closed(_)) => {
                trace!(session = self.session, "session closed; record discarded");
            }
        }
    }

    /// The backend itself lost events (e.g. its own queue overflowed).
    pub fn overflow(&self) {
        self.signals.raise_overflow();
    }

    /// The backend can no longer deliver records. Ends the session.
    pub fn fail(&self, reason: impl Into<String>) {
        self.signals.raise_failure(reason.into());
    }

    /// Whether the session behind this sink has terminated.
    pub fn is_closed(&self) -> bool {
        self.intake.is_closed()
    }
}
