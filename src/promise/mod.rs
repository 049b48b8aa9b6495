//! The promise primitive: a single-settlement asynchronous value.
//!
//! A [`Promise`] starts pending and settles at most once, either fulfilled
//! with a value or rejected with a reason. Continuations attached with
//! [`then`](Promise::then), [`catch`](Promise::catch) and friends each
//! produce a new promise, which is how values and failures travel down a
//! chain.
//!
//! # Example
//!
//! ```ignore
//! use pledge::{Error, Promise};
//!
//! let doubled = Promise::<u32>::new(|resolver| {
//!     resolver.resolve(21);
//!     Ok(())
//! })
//! .then(|n| Ok(n * 2))
//! .catch(|_: Error| Ok(0));
//!
//! assert_eq!(doubled.wait(), Ok(42));
//! ```
//!
//! # Failures
//!
//! Returning `Err` from an executor or from any handler rejects the promise
//! that handler feeds. Nothing inside this module panics on a rejection and
//! an unobserved rejection is simply a promise that stays rejected.

mod future;
mod resolver;
mod state;

pub use future::Settled;
pub use resolver::Resolver;
pub use state::PromiseState;

use crate::error::Error;
use state::State;

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A shared handle to an asynchronous value of type `T` that may instead fail
/// with a reason of type `E`.
///
/// Handles are cheap to clone and all clones observe the same settlement.
/// `T` and `E` are cloned once per observer, so large payloads are best kept
/// behind an `Arc`.
pub struct Promise<T, E = Error> {
    shared: Arc<Mutex<State<T, E>>>,
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a promise and runs `executor` synchronously, exactly once.
    ///
    /// The executor may settle through the [`Resolver`] right away, stash the
    /// resolver and settle later from another callback or thread, or never
    /// settle at all. Returning `Err` rejects the promise with that reason,
    /// unless the executor already settled it, in which case the error is
    /// ignored.
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) -> Result<(), E>,
    {
        let (promise, resolver) = Self::pending();

        if let Err(reason) = executor(resolver.clone()) {
            resolver.reject(reason);
        }

        promise
    }

    /// Creates an unsettled promise together with the resolver that settles it.
    pub fn pending() -> (Self, Resolver<T, E>) {
        let shared = Arc::new(Mutex::new(State::new()));
        let resolver = Resolver {
            shared: shared.clone(),
        };

        (Self { shared }, resolver)
    }

    /// Creates a promise that is already fulfilled with `value`.
    pub fn resolved(value: T) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.resolve(value);
        promise
    }

    /// Creates a promise that is already rejected with `reason`.
    pub fn rejected(reason: E) -> Self {
        let (promise, resolver) = Self::pending();
        resolver.reject(reason);
        promise
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> PromiseState {
        self.shared.lock().kind()
    }

    /// Returns `true` while the promise has neither fulfilled nor rejected.
    pub fn is_pending(&self) -> bool {
        self.state() == PromiseState::Pending
    }

    /// Returns `true` once the promise has fulfilled or rejected.
    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    /// Returns a copy of the outcome if the promise has settled.
    pub fn peek(&self) -> Option<Result<T, E>> {
        self.shared.lock().outcome()
    }

    /// Runs `reaction` with the outcome: at settlement time if pending, or
    /// immediately on the calling thread if already settled.
    pub(crate) fn subscribe<F>(&self, reaction: F)
    where
        F: FnOnce(Result<T, E>) + Send + 'static,
    {
        let ready = self.shared.lock().register(Box::new(reaction));

        if let Some((reaction, outcome)) = ready {
            reaction(outcome);
        }
    }

    /// Attaches a fulfillment handler. Rejections pass through unchanged.
    pub fn then<U, F>(&self, on_fulfilled: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        self.then_or_else(on_fulfilled, |reason| Err(reason))
    }

    /// Attaches one handler per branch.
    ///
    /// The handler matching the settled branch runs exactly once. Its `Ok`
    /// fulfills the returned promise and its `Err` rejects it.
    pub fn then_or_else<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
        R: FnOnce(E) -> Result<U, E> + Send + 'static,
    {
        let (next, resolver) = Promise::pending();

        self.subscribe(move |outcome| {
            let result = match outcome {
                Ok(value) => on_fulfilled(value),
                Err(reason) => on_rejected(reason),
            };
            resolver.settle(result);
        });

        next
    }

    /// Attaches a rejection handler. Values pass through unchanged.
    pub fn catch<R>(&self, on_rejected: R) -> Promise<T, E>
    where
        R: FnOnce(E) -> Result<T, E> + Send + 'static,
    {
        self.then_or_else(|value| Ok(value), on_rejected)
    }

    /// Recovers from a rejection.
    ///
    /// Behaves like [`catch`](Self::catch): an `Ok` from `handler` becomes the
    /// new fulfillment value and an `Err` becomes the new rejection reason.
    pub fn on_error<H>(&self, handler: H) -> Promise<T, E>
    where
        H: FnOnce(E) -> Result<T, E> + Send + 'static,
    {
        self.catch(handler)
    }

    /// Runs `on_finally` on either branch, then reproduces the original
    /// outcome.
    ///
    /// The original outcome always wins: an `Err` returned by `on_finally` is
    /// logged at `warn` level and otherwise discarded.
    pub fn finally<F>(&self, on_finally: F) -> Promise<T, E>
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
        E: fmt::Debug,
    {
        let (next, resolver) = Promise::pending();

        self.subscribe(move |outcome| {
            if let Err(reason) = on_finally() {
                warn!(?reason, "finally callback failed, keeping original outcome");
            }
            resolver.settle(outcome);
        });

        next
    }

    /// Transforms the fulfillment value with an infallible function.
    pub fn map<U, F>(&self, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.then(move |value| Ok(f(value)))
    }

    /// Transforms the rejection reason, possibly into another error type.
    pub fn map_err<E2, F>(&self, f: F) -> Promise<T, E2>
    where
        E2: Clone + Send + 'static,
        F: FnOnce(E) -> E2 + Send + 'static,
    {
        let (next, resolver) = Promise::pending();

        self.subscribe(move |outcome| {
            resolver.settle(outcome.map_err(f));
        });

        next
    }

    /// Chains a promise-returning step. The returned promise adopts whatever
    /// outcome the inner promise settles with.
    pub fn and_then<U, F>(&self, f: F) -> Promise<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Promise<U, E> + Send + 'static,
    {
        let (next, resolver) = Promise::pending();

        self.subscribe(move |outcome| match outcome {
            Ok(value) => f(value).subscribe(move |inner| {
                resolver.settle(inner);
            }),
            Err(reason) => {
                resolver.reject(reason);
            }
        });

        next
    }

    /// Blocks the current thread until the promise settles.
    ///
    /// The promise must be settled by something other than the blocked
    /// thread: a timer, a worker, or another thread holding the resolver.
    /// Inside a [`Runtime`](crate::Runtime) prefer `.await` instead.
    pub fn wait(&self) -> Result<T, E> {
        futures::executor::block_on(Settled::new(self.clone()))
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.shared.lock().kind())
            .finish()
    }
}
