#![allow(dead_code)]
//! Shared integration test utilities.

use pledge::Promise;
use std::sync::Once;
use std::time::{Duration, Instant};

static INIT_LOGGING: Once = Once::new();

/// Routes crate tracing output to the test harness writer.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

pub fn init_test_logging_with_level(level: tracing::Level) {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Polls `promise` until it settles or `limit` elapses.
///
/// Returns `None` when the promise is still pending at the deadline, which
/// lets tests assert that something never settles without hanging.
pub fn settle_within<T, E>(promise: &Promise<T, E>, limit: Duration) -> Option<Result<T, E>>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let deadline = Instant::now() + limit;

    loop {
        if let Some(outcome) = promise.peek() {
            return Some(outcome);
        }
        if Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}
