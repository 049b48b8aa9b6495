//! Deadline combinator for promises.
//!
//! # Example
//!
//! ```ignore
//! use pledge::time::{delay, timeout};
//! use pledge::Error;
//! use std::time::Duration;
//!
//! let fast = delay::<Error>(Duration::from_millis(5)).map(|_| "done");
//! assert_eq!(timeout(fast, Duration::from_millis(100)).wait(), Ok("done"));
//! ```

use crate::error::TimeError;
use crate::promise::Promise;
use crate::timer;

use std::time::Duration;
use tracing::debug;

/// Races `promise` against a timer of `duration`.
///
/// If the timer fires first, the returned promise rejects with
/// [`TimeError::TimeOut`] and whatever `promise` settles with later is
/// ignored. If `promise` settles first, the timer is cancelled and its
/// outcome is passed through. The wrapped operation itself keeps running
/// either way; only its observable outcome is cut off.
pub fn timeout<T, E>(promise: Promise<T, E>, duration: Duration) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<TimeError> + 'static,
{
    let (next, resolver) = Promise::pending();

    let expire = resolver.clone();
    let timer = timer::schedule(duration, move || {
        if expire.reject(E::from(TimeError::TimeOut(duration))) {
            debug!(?duration, "promise timed out");
        }
    });

    promise.subscribe(move |outcome| {
        timer::cancel(timer);
        resolver.settle(outcome);
    });

    next
}
