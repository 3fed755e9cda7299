#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};
use treewatch::backend::ManualBackend;
use treewatch::fs::mock::MockFileSystem;
use treewatch::watch::{WatchOptions, Watcher};
use treewatch::{Event, EventKind};

pub const TEST_BACKEND_BUFFER: usize = 10;
pub const MOCK_ROOT: &str = "/watch/root";

/// `dir/name`, the way event names are reported relative to the root.
pub fn joined(dir: &str, name: &str) -> String {
    if dir == "." {
        name.to_string()
    } else if name == "." {
        dir.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

pub fn ev(name: impl Into<String>, kind: EventKind) -> Event {
    Event::new(name, kind)
}

/// Watcher over an in-memory tree at [`MOCK_ROOT`] fed by a manual backend.
pub fn manual_watcher(dirs: &[&str], options: WatchOptions) -> (Watcher, ManualBackend, MockFileSystem) {
    let fs = MockFileSystem::new();
    fs.add_dir(MOCK_ROOT);
    for dir in dirs {
        fs.add_dir(Path::new(MOCK_ROOT).join(dir));
    }
    let backend = ManualBackend::new();
    let watcher = Watcher::with_parts(
        MOCK_ROOT,
        Arc::new(fs.clone()),
        Arc::new(backend.clone()),
        options,
    )
    .expect("mock root is a directory");
    (watcher, backend, fs)
}

pub fn small_options() -> WatchOptions {
    WatchOptions::default()
        .with_backend_buffer(TEST_BACKEND_BUFFER)
        .with_output_buffer(1)
}

/// Outcome of [`expect_events`].
#[derive(Debug, Default)]
pub struct Observed {
    /// Everything received, in order, duplicates included.
    pub received: Vec<Event>,
}

impl Observed {
    pub fn count(&self, event: &Event) -> usize {
        self.received.iter().filter(|e| *e == event).count()
    }
}

/// Read `stream` until every `expected` event was seen.
///
/// - Repeats of the previous event are tolerated (backends repeat).
/// - Events in `allowed` are tolerated; after each one the reader naps for
///   100ms so a burst can pile up in the session's queue.
/// - Any other event fails the scenario.
pub async fn expect_events(
    stream: &mut treewatch::watch::EventStream,
    expected: &[Event],
    allowed: &[Event],
    limit: Duration,
) -> Result<Observed, String> {
    let mut pending: HashSet<Event> = expected.iter().cloned().collect();
    let allowed: HashSet<Event> = allowed.iter().cloned().collect();
    let mut observed = Observed::default();
    let mut last: Option<Event> = None;
    let deadline = Instant::now() + limit;

    while !pending.is_empty() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let received = match timeout(remaining, stream.recv()).await {
            Ok(Some(event)) => event,
            Ok(None) => return Err(format!("stream ended; still expecting {pending:?}")),
            Err(_) => return Err(format!("timed out; still expecting {pending:?}")),
        };
        observed.received.push(received.clone());

        if last.as_ref() == Some(&received) {
            continue;
        }

        if pending.remove(&received) {
            last = Some(received);
            continue;
        }

        if expected.contains(&received) || allowed.contains(&received) {
            last = Some(received);
            sleep(Duration::from_millis(100)).await;
            continue;
        }

        return Err(format!(
            "received unexpected event {received:?}, expected one of {pending:?}"
        ));
    }

    Ok(observed)
}

/// Collect whatever arrives within `window`.
pub async fn drain_for(stream: &mut treewatch::watch::EventStream, window: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    let deadline = Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining, stream.recv()).await {
            Ok(Some(event)) => events.push(event),
            Ok(None) | Err(_) => return events,
        }
    }
}
