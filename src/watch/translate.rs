// src/watch/translate.rs

//! Pure event translation and overflow coalescing state machine.
//!
//! This module is synchronous and deterministic: it has no channels, no
//! Tokio types and performs no IO. The session worker
//! (`watch::session`) feeds it scoped records and overflow signals and
//! forwards whatever it returns to the output stream.
//!
//! States:
//! - `Active`: records are classified and passed through, minus
//!   consecutive duplicates.
//! - `Overflowed`: one root event has been emitted; everything else is
//!   suppressed until [`Translator::reset`].
//! - `Terminated`: nothing is ever emitted again.

use tracing::{debug, warn};

use crate::types::{Event, NativeKind};
use crate::watch::kinds::KindTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorState {
    Active,
    Overflowed,
    Terminated,
}

/// A record that already passed scoping and ignore filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedRecord {
    pub name: String,
    pub kind: NativeKind,
}

impl ScopedRecord {
    pub fn new(name: impl Into<String>, kind: NativeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug)]
pub struct Translator {
    state: TranslatorState,
    table: KindTable,
    /// Last emitted event, for duplicate suppression.
    last: Option<Event>,
}

impl Translator {
    pub fn new(table: KindTable) -> Self {
        Self {
            state: TranslatorState::Active,
            table,
            last: None,
        }
    }

    pub fn state(&self) -> TranslatorState {
        self.state
    }

    pub fn table(&self) -> &KindTable {
        &self.table
    }

    /// Translate one record. Returns the event to emit, if any.
    pub fn on_record(&mut self, record: ScopedRecord) -> Option<Event> {
        match self.state {
            TranslatorState::Active => {}
            TranslatorState::Overflowed => {
                debug!(name = %record.name, "overflowed; suppressing record");
                return None;
            }
            TranslatorState::Terminated => return None,
        }

        let Some(kind) = self.table.classify(record.kind) else {
            debug!(name = %record.name, native = ?record.kind, "native kind is not a change");
            return None;
        };

        let event = Event::new(record.name, kind);
        self.emit(event)
    }

    /// The intake queue overflowed (or the backend lost events).
    ///
    /// Emits the root event on the first signal of a burst only.
    pub fn on_overflow(&mut self) -> Option<Event> {
        match self.state {
            TranslatorState::Active => {
                warn!("intake queue overflowed; coalescing into a root event");
                self.state = TranslatorState::Overflowed;
                let event = Event::root();
                self.last = Some(event.clone());
                Some(event)
            }
            TranslatorState::Overflowed => {
                debug!("already overflowed; root event was sent");
                None
            }
            TranslatorState::Terminated => None,
        }
    }

    /// Leave `Overflowed` once the consumer has rescanned.
    ///
    /// Returns whether the state changed.
    pub fn reset(&mut self) -> bool {
        if self.state != TranslatorState::Overflowed {
            return false;
        }
        debug!("overflow reset; resuming per-path events");
        self.state = TranslatorState::Active;
        self.last = None;
        true
    }

    pub fn terminate(&mut self) {
        self.state = TranslatorState::Terminated;
    }

    fn emit(&mut self, event: Event) -> Option<Event> {
        if self.last.as_ref() == Some(&event) {
            debug!(%event, "suppressing duplicate event");
            return None;
        }
        self.last = Some(event.clone());
        Some(event)
    }
}
