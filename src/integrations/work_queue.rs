//! Background work queue whose jobs report back through promises.
//!
//! Jobs travel over a `crossbeam-channel` MPMC channel to a fixed set of
//! worker threads. Workers block on the channel while idle, so there is no
//! polling. Closing the queue drops the sender, which lets every worker drain
//! the jobs already queued and then exit.

use crate::error::Error;
use crate::promise::Promise;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send>;

/// Configuration for a [`WorkQueue`].
#[derive(Debug, Clone)]
pub struct WorkQueueBuilder {
    workers: usize,
    thread_name: String,
}

impl Default for WorkQueueBuilder {
    fn default() -> Self {
        Self {
            workers: 1,
            thread_name: "pledge-worker".to_string(),
        }
    }
}

impl WorkQueueBuilder {
    /// Number of worker threads; zero is treated as one.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Prefix for worker thread names; each worker appends its index.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Starts the workers.
    ///
    /// Fails with [`Error::Message`] if no worker thread could be spawned.
    pub fn build(self) -> Result<WorkQueue, Error> {
        let (sender, receiver) = unbounded::<Job>();
        let mut handles = Vec::with_capacity(self.workers.max(1));

        for index in 0..self.workers.max(1) {
            let receiver = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("{}-{index}", self.thread_name))
                .spawn(move || work(index, receiver));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => error!(%err, index, "failed to spawn worker"),
            }
        }

        if handles.is_empty() {
            return Err(Error::msg("work queue could not start any worker"));
        }

        Ok(WorkQueue {
            sender: Mutex::new(Some(sender)),
            handles: Mutex::new(handles),
        })
    }
}

/// A pool of worker threads running submitted jobs.
pub struct WorkQueue {
    sender: Mutex<Option<Sender<Job>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkQueue {
    pub fn builder() -> WorkQueueBuilder {
        WorkQueueBuilder::default()
    }

    /// Queues `job` and returns a promise of its result.
    ///
    /// The promise settles on the worker thread that ran the job, so its
    /// reactions run there as well. A job that panics rejects its promise, and
    /// a reaction that panics is logged; neither takes the worker down. Once
    /// the queue is shut down, submissions reject with [`Error::QueueClosed`].
    pub fn submit<T, F>(&self, job: F) -> Promise<T, Error>
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> Result<T, Error> + Send + 'static,
    {
        let (promise, resolver) = Promise::pending();

        let queued: Job = {
            let resolver = resolver.clone();
            Box::new(move || {
                let outcome = catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|_| {
                    error!("queued job panicked");
                    Err(Error::msg("queued job panicked"))
                });

                // Reactions run here too; one that panics must not take the worker down.
                if catch_unwind(AssertUnwindSafe(|| resolver.settle(outcome))).is_err() {
                    error!("reaction to a queued job panicked");
                }
            })
        };

        let sent = match self.sender.lock().as_ref() {
            Some(sender) => sender.send(queued).is_ok(),
            None => false,
        };

        if !sent {
            resolver.reject(Error::QueueClosed);
        }

        promise
    }

    /// Returns `true` until [`shutdown`](Self::shutdown) has been called.
    pub fn is_open(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Stops accepting jobs, lets the workers finish what is queued, and
    /// waits for them to exit. Calling it again does nothing.
    ///
    /// Called from a worker thread (for instance by a reaction to a job's
    /// promise), it waits for every worker except the calling one.
    pub fn shutdown(&self) {
        self.sender.lock().take();

        let current = thread::current().id();
        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                error!("worker thread panicked");
            }
        }
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn work(index: usize, receiver: Receiver<Job>) {
    debug!(index, "worker started");

    for job in receiver.iter() {
        job();
    }

    debug!(index, "worker stopped");
}
