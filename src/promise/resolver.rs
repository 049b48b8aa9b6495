//! Settlement handle handed to promise executors.

use crate::error::Error;
use crate::promise::state::{Reaction, State};

use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

type FlushJob = Box<dyn FnOnce()>;

// Per-thread run queue for reaction flushes. Only the outermost `settle` on a
// thread drains it, so chained settlements run in a loop instead of nesting.
struct FlushQueue {
    draining: bool,
    jobs: VecDeque<FlushJob>,
}

thread_local! {
    static FLUSH_QUEUE: RefCell<FlushQueue> = const {
        RefCell::new(FlushQueue {
            draining: false,
            jobs: VecDeque::new(),
        })
    };
}

/// Write side of a [`Promise`](crate::Promise).
///
/// Cloning a resolver is cheap; every clone settles the same promise. Only
/// the first call to [`resolve`](Self::resolve), [`reject`](Self::reject) or
/// [`settle`](Self::settle) across all clones has an effect, later calls are
/// silent no-ops that return `false`.
pub struct Resolver<T, E = Error> {
    pub(crate) shared: Arc<Mutex<State<T, E>>>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Fulfills the promise with `value`.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Rejects the promise with `reason`.
    pub fn reject(&self, reason: E) -> bool {
        self.settle(Err(reason))
    }

    /// Settles the promise on whichever branch `outcome` is.
    ///
    /// Queued reactions run on the calling thread, in registration order,
    /// after the lock is released. A reaction that attaches another reaction
    /// to this same promise sees it already settled and runs it inline.
    ///
    /// When a reaction settles another promise, that promise's reactions run
    /// right after the current reaction returns rather than inside it. Every
    /// flush started on a thread has finished by the time the outermost
    /// `settle` returns, and chains of any length settle in constant stack
    /// depth. A reaction must therefore not block waiting for a promise that
    /// only its own downstream reactions would settle.
    pub fn settle(&self, outcome: Result<T, E>) -> bool {
        let reactions = self.shared.lock().settle(&outcome);

        let Some(reactions) = reactions else {
            return false;
        };

        trace!(
            fulfilled = outcome.is_ok(),
            reactions = reactions.len(),
            "promise settled"
        );

        run_flush(Box::new(move || flush(reactions, outcome)));
        true
    }

    /// Returns `true` once the promise has left the pending state.
    pub fn is_settled(&self) -> bool {
        self.shared.lock().kind().is_settled()
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("state", &self.shared.lock().kind())
            .finish()
    }
}

// Clears the draining flag even if a reaction unwinds. Jobs still queued at
// that point run with the next flush on this thread.
struct Draining;

impl Drop for Draining {
    fn drop(&mut self) {
        let _ = FLUSH_QUEUE.try_with(|queue| queue.borrow_mut().draining = false);
    }
}

fn run_flush(job: FlushJob) {
    let first = FLUSH_QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        if queue.draining {
            queue.jobs.push_back(job);
            None
        } else {
            queue.draining = true;
            Some(job)
        }
    });

    let Some(first) = first else {
        return;
    };

    let _draining = Draining;
    first();

    while let Some(job) = FLUSH_QUEUE.with(|queue| queue.borrow_mut().jobs.pop_front()) {
        job();
    }
}

fn flush<T: Clone, E: Clone>(reactions: Vec<Reaction<T, E>>, outcome: Result<T, E>) {
    let mut reactions = reactions.into_iter().peekable();

    while let Some(reaction) = reactions.next() {
        if reactions.peek().is_some() {
            reaction(outcome.clone());
        } else {
            reaction(outcome);
            break;
        }
    }
}
