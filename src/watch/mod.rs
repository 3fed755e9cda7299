// src/watch/mod.rs

//! Filesystem change watching.
//!
//! This module is responsible for:
//! - Scoping absolute backend paths to root-relative names (`scope`).
//! - Dropping ignored paths (`ignore`).
//! - Translating native kinds into `Remove` / `NonRemove` and coalescing
//!   overflow into a single root event (`kinds`, `translate`).
//! - Running one worker per watch session and handing events to the
//!   consumer (`session`, `watcher`).
//!
//! It does **not** know how records are produced; see `crate::backend`.

pub mod ignore;
pub mod kinds;
pub mod scope;
pub mod session;
pub mod translate;
pub mod watcher;

pub use ignore::{GlobIgnore, IgnoreFilter, NoIgnore};
pub use kinds::KindTable;
pub use scope::Scoper;
pub use session::EventStream;
pub use translate::{ScopedRecord, Translator, TranslatorState};
pub use watcher::{DEFAULT_BACKEND_BUFFER, DEFAULT_OUTPUT_BUFFER, WatchOptions, Watcher};
