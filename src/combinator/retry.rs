//! Retry combinators.
//!
//! Each attempt is a fresh promise produced by a factory closure. On
//! rejection the factory is called again until an attempt fulfills or the
//! attempt budget runs out, in which case the last rejection reason is
//! surfaced unchanged.
//!
//! # Example
//!
//! ```ignore
//! use pledge::combinator::retry;
//! use pledge::{Error, Promise};
//!
//! let mut calls = 0;
//! let result = retry(
//!     move || {
//!         calls += 1;
//!         if calls < 3 {
//!             Promise::rejected(Error::msg("flaky"))
//!         } else {
//!             Promise::resolved(calls)
//!         }
//!     },
//!     2,
//! );
//! assert_eq!(result.wait(), Ok(3));
//! ```

use crate::promise::{Promise, Resolver};
use crate::timer;

use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
enum Budget {
    Limited(usize),
    Unlimited,
}

impl Budget {
    /// Budget left for the next attempt, or `None` if exhausted.
    fn next(self) -> Option<Budget> {
        match self {
            Budget::Limited(0) => None,
            Budget::Limited(n) => Some(Budget::Limited(n - 1)),
            Budget::Unlimited => Some(Budget::Unlimited),
        }
    }
}

/// Runs `factory` and re-runs it right away on rejection, at most `retries`
/// more times.
///
/// `retries = 0` means a single attempt. The factory is called
/// synchronously for the first attempt and from the settling thread for
/// later ones.
pub fn retry<T, E, F>(factory: F, retries: usize) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnMut() -> Promise<T, E> + Send + 'static,
{
    start(factory, Budget::Limited(retries), None)
}

/// Like [`retry`], but waits `delay` between a failed attempt and the next
/// one.
///
/// There is no delay after the final failure; the result rejects as soon as
/// the budget is spent.
pub fn retry_with_delay<T, E, F>(factory: F, retries: usize, delay: Duration) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnMut() -> Promise<T, E> + Send + 'static,
{
    start(factory, Budget::Limited(retries), Some(delay))
}

/// Re-runs `factory` with `delay` between attempts until one fulfills.
///
/// There is no upper bound on attempts, so a factory that always rejects
/// keeps this promise pending forever. Bound it with
/// [`timeout`](crate::time::timeout) or use [`retry_with_delay`] instead.
/// Every retry goes through the timer service, so the loop never grows the
/// stack.
pub fn repeat_until_success<T, E, F>(factory: F, delay: Duration) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnMut() -> Promise<T, E> + Send + 'static,
{
    start(factory, Budget::Unlimited, Some(delay))
}

fn start<T, E, F>(factory: F, budget: Budget, delay: Option<Duration>) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnMut() -> Promise<T, E> + Send + 'static,
{
    let (promise, resolver) = Promise::pending();
    attempt(factory, budget, delay, 1, resolver);
    promise
}

// Attempts whose promise is already settled are handled in a loop, so a
// factory that fails synchronously never deepens the stack. Only a pending
// attempt, or a delayed retry, continues from a callback.
fn attempt<T, E, F>(
    mut factory: F,
    mut budget: Budget,
    delay: Option<Duration>,
    mut number: usize,
    resolver: Resolver<T, E>,
) where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnMut() -> Promise<T, E> + Send + 'static,
{
    loop {
        let current = factory();

        let Some(outcome) = current.peek() else {
            current.subscribe(move |outcome| {
                if let Some(remaining) = conclude(outcome, budget, number, &resolver) {
                    next_attempt(factory, remaining, delay, number + 1, resolver);
                }
            });
            return;
        };

        let Some(remaining) = conclude(outcome, budget, number, &resolver) else {
            return;
        };

        if delay.is_some() {
            next_attempt(factory, remaining, delay, number + 1, resolver);
            return;
        }

        budget = remaining;
        number += 1;
    }
}

/// Settles `resolver` when `outcome` ends the loop, otherwise returns the
/// budget left for the next attempt.
fn conclude<T, E>(
    outcome: Result<T, E>,
    budget: Budget,
    number: usize,
    resolver: &Resolver<T, E>,
) -> Option<Budget>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let reason = match outcome {
        Ok(value) => {
            resolver.resolve(value);
            return None;
        }
        Err(reason) => reason,
    };

    let Some(remaining) = budget.next() else {
        debug!(attempts = number, "retry budget exhausted");
        resolver.reject(reason);
        return None;
    };

    debug!(attempt = number, ?remaining, "attempt failed, retrying");
    Some(remaining)
}

fn next_attempt<T, E, F>(
    factory: F,
    budget: Budget,
    delay: Option<Duration>,
    number: usize,
    resolver: Resolver<T, E>,
) where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnMut() -> Promise<T, E> + Send + 'static,
{
    match delay {
        Some(delay) => {
            timer::schedule(delay, move || {
                attempt(factory, budget, Some(delay), number, resolver);
            });
        }
        None => attempt(factory, budget, None, number, resolver),
    }
}
