//! Shared fixtures for treewatch's integration tests.

pub mod fixtures;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

pub use fixtures::{FakeIgnore, TestTree};

static TRACING: Once = Once::new();

/// Upper bound for a single awaited step in a test.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output through the test harness.
///
/// Output is captured per test and only shown for failures. The filter is
/// read from `TREEWATCH_LOG` (same syntax as `RUST_LOG`), default `info`;
/// `TREEWATCH_LOG=treewatch=debug` shows every emitted and suppressed event.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("TREEWATCH_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // Another harness may already have installed one.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test after [`STEP_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(STEP_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test step did not finish within {STEP_TIMEOUT:?}"),
    }
}
