//! Thread-safe task queue for managing ready tasks.
//!
//! Provides a FIFO queue that allows pushing tasks to be executed and popping
//! them for execution by the executor. Pushing also unparks the thread that is
//! currently driving the queue, since wake-ups can arrive from the timer
//! thread or from work-queue workers.

use crate::task::Runnable;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::Thread;

/// A thread-safe, FIFO queue for storing executable tasks.
pub(crate) struct TaskQueue {
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,
    driver: Mutex<Option<Thread>>,
}

impl TaskQueue {
    /// Creates a new empty task queue with no driving thread.
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            driver: Mutex::new(None),
        }
    }

    /// Enqueues a task to be executed and wakes the driving thread.
    ///
    /// # Arguments
    /// * `task` - The task to enqueue
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.queue.lock().push_back(task);
        self.unpark_driver();
    }

    /// Dequeues and returns the next ready task, if any.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.queue.lock().pop_front()
    }

    /// Checks if the task queue is empty.
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Records which thread is blocked in `block_on` for this queue.
    ///
    /// Returns the previously registered thread so nested calls can restore it.
    pub(crate) fn set_driver(&self, thread: Option<Thread>) -> Option<Thread> {
        std::mem::replace(&mut *self.driver.lock(), thread)
    }

    fn unpark_driver(&self) {
        if let Some(thread) = self.driver.lock().as_ref() {
            thread.unpark();
        }
    }
}
