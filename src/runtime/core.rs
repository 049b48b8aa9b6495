//! Async runtime that executes futures and manages task scheduling.
//!
//! The runtime coordinates the execution of a main future via `block_on` and
//! handles spawned background tasks. Promises settle from timers, workers or
//! other threads, so when nothing is ready the driving thread parks until a
//! waker unparks it instead of spinning.

use crate::builder::RuntimeBuilder;
use crate::runtime::waker::MainWaker;
use crate::runtime::{Executor, TaskQueue, enter_context};
use crate::task::{JoinHandle, Task};

use std::future::{Future, IntoFuture};
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;
use tracing::trace;

/// Main async runtime for executing futures and awaiting promises.
///
/// Provides the core API for running futures to completion and spawning
/// background tasks. Everything spawned here is polled on the thread that
/// calls [`Runtime::block_on`].
pub struct Runtime {
    queue: Arc<TaskQueue>,
    executor: Executor,
    event_interval: usize,
}

impl Runtime {
    /// Creates a runtime with the default configuration.
    ///
    /// # Example
    /// ```ignore
    /// let rt = Runtime::new();
    /// ```
    pub fn new() -> Self {
        RuntimeBuilder::new().build()
    }

    pub(crate) fn with_event_interval(event_interval: usize) -> Self {
        let queue = Arc::new(TaskQueue::new());
        let executor = Executor::new(queue.clone());

        Self {
            queue,
            executor,
            event_interval: event_interval.max(1),
        }
    }

    /// Spawns a background task to be executed concurrently.
    ///
    /// The task runs the next time `block_on` drains the task queue.
    ///
    /// # Example
    /// ```ignore
    /// let handle = rt.spawn(async { 7 });
    /// assert_eq!(rt.block_on(handle), 7);
    /// ```
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        Task::spawn_on(fut, self.queue.clone())
    }

    /// Blocks until the given future (or promise) completes, processing
    /// spawned tasks along the way.
    ///
    /// This also establishes a runtime context, so code running inside can
    /// use [`Task::spawn`] and [`Promise::from_future`](crate::Promise::from_future)
    /// without a runtime reference. Tasks that are still ready when the main
    /// future finishes are run before returning.
    ///
    /// # Example
    /// ```ignore
    /// let value = rt.block_on(Promise::<u32>::resolved(42));
    /// assert_eq!(value, Ok(42));
    /// ```
    pub fn block_on<F: IntoFuture>(&mut self, fut: F) -> F::Output {
        let previous_driver = self.queue.set_driver(Some(thread::current()));

        let output = enter_context(self.queue.clone(), || {
            let mut fut = pin!(fut.into_future());

            let main = MainWaker::for_current_thread();
            let waker = futures::task::waker(main.clone());
            let mut cx = Context::from_waker(&waker);

            loop {
                if let Poll::Ready(output) = fut.as_mut().poll(&mut cx) {
                    self.executor.drain();
                    return output;
                }

                let ran = self.executor.run(self.event_interval);

                if main.take_notified() || !self.queue.is_empty() {
                    continue;
                }

                trace!(ran, "runtime idle, parking");
                thread::park();
            }
        });

        self.queue.set_driver(previous_driver);
        output
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
