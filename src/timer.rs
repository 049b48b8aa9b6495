//! Timer service backing `delay`, `timeout`, `sleep` and the retry combinators.
//!
//! Timers are kept by a [`TimerDriver`] that lives behind a process-wide
//! mutex. A dedicated driver thread is started the first time a timer is
//! scheduled; it sleeps on a condition variable until the nearest deadline
//! (or until a new timer is registered) and then runs every expired callback
//! outside of the lock, avoiding busy polling.
//!
//! Callbacks run on the driver thread, so anything they settle runs its
//! reactions there too.

use parking_lot::{Condvar, Mutex, MutexGuard, const_mutex};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Once;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Zero-argument callback run once a timer expires.
pub type Callback = Box<dyn FnOnce() + Send>;

/// Identifies a scheduled timer so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Entry {
    id: TimerId,
    deadline: Instant,
    callback: Callback,
}

/// Registered timers, ordered by nothing in particular.
///
/// Expired entries are handed out sorted by deadline, with registration order
/// breaking ties.
pub(crate) struct TimerDriver {
    timers: Vec<Entry>,
    next_id: u64,
}

impl TimerDriver {
    const fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Registers `callback` to run once `deadline` is reached.
    pub(crate) fn register(&mut self, deadline: Instant, callback: Callback) -> TimerId {
        let id = self.next_id();

        self.timers.push(Entry {
            id,
            deadline,
            callback,
        });

        id
    }

    /// Removes a timer that has not fired yet.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|entry| entry.id != id);
        self.timers.len() != before
    }

    /// Removes and returns every callback whose deadline is at or before `now`.
    pub(crate) fn take_expired(&mut self, now: Instant) -> Vec<Callback> {
        let (mut expired, pending): (Vec<Entry>, Vec<Entry>) = self
            .timers
            .drain(..)
            .partition(|entry| entry.deadline <= now);

        self.timers = pending;
        expired.sort_by_key(|entry| (entry.deadline, entry.id.0));

        expired.into_iter().map(|entry| entry.callback).collect()
    }

    /// Time left until the nearest deadline, if any timer is registered.
    pub(crate) fn next_remaining(&self, now: Instant) -> Option<Duration> {
        self.timers
            .iter()
            .map(|entry| entry.deadline.saturating_duration_since(now))
            .min()
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }
}

struct TimerService {
    driver: Mutex<TimerDriver>,
    condvar: Condvar,
}

static SERVICE: TimerService = TimerService {
    driver: const_mutex(TimerDriver::new()),
    condvar: Condvar::new(),
};

static STARTED: Once = Once::new();

/// Schedules `callback` to run once `duration` has elapsed.
///
/// A zero duration still defers the callback to the driver thread, it never
/// runs inline. A duration too large to represent as a deadline (such as
/// `Duration::MAX`) means "never": the callback is dropped without running
/// and the returned id is one that never fires.
pub fn schedule<F>(duration: Duration, callback: F) -> TimerId
where
    F: FnOnce() + Send + 'static,
{
    let Some(deadline) = Instant::now().checked_add(duration) else {
        let id = SERVICE.driver.lock().next_id();
        debug!(?id, ?duration, "deadline out of range, timer will never fire");
        return id;
    };

    ensure_driver();

    let id = SERVICE.driver.lock().register(deadline, Box::new(callback));
    SERVICE.condvar.notify_one();

    debug!(?id, ?duration, "timer scheduled");
    id
}

/// Cancels a timer. Returns `false` if it already fired or was cancelled.
pub fn cancel(id: TimerId) -> bool {
    SERVICE.driver.lock().cancel(id)
}

/// Number of timers waiting to fire.
pub fn pending() -> usize {
    SERVICE.driver.lock().len()
}

// Starts the driver thread once for the whole process.
fn ensure_driver() {
    STARTED.call_once(|| {
        let spawned = thread::Builder::new()
            .name("pledge-timer".into())
            .spawn(drive);

        if let Err(err) = spawned {
            error!(%err, "failed to start timer driver thread");
        }
    });
}

fn drive() {
    let mut driver = SERVICE.driver.lock();

    loop {
        let now = Instant::now();
        let expired = driver.take_expired(now);

        if !expired.is_empty() {
            debug!(count = expired.len(), "firing expired timers");
            MutexGuard::unlocked(&mut driver, || fire(expired));
            continue;
        }

        match driver.next_remaining(now) {
            Some(remaining) => {
                SERVICE.condvar.wait_for(&mut driver, remaining);
            }
            None => SERVICE.condvar.wait(&mut driver),
        }
    }
}

fn fire(callbacks: Vec<Callback>) {
    for callback in callbacks {
        if catch_unwind(AssertUnwindSafe(callback)).is_err() {
            error!("timer callback panicked");
        }
    }
}
