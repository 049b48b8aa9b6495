//! Task wrapper that combines futures with waker integration.
//!
//! A task encapsulates a future and provides mechanisms for polling and
//! awakening when the future is ready to make progress. Tasks are spawned
//! either on an explicit [`Runtime`](crate::Runtime) or, from inside
//! `block_on`, through the global [`Task::spawn`].
//!
//! # Task Spawning
//!
//! ```ignore
//! use pledge::Task;
//!
//! async fn spawn_example() {
//!     let handle = Task::spawn(async { 42 });
//!     assert_eq!(handle.await, 42);
//! }
//! ```
//!
//! # How Tasks Work
//!
//! 1. A future is wrapped in a [`Task`]
//! 2. The task is enqueued in the runtime's task queue
//! 3. The executor polls the task with a waker that re-queues it
//! 4. When the future yields `Poll::Pending`, it's stored for later
//! 5. When a timer fires or a promise settles, the waker re-queues the task
//! 6. The task is polled again and can make progress

use crate::runtime::context::current_queue;
use crate::runtime::{TaskQueue, make_waker};

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A spawned task that wraps a future and supports generic output.
///
/// Tasks are created via [`Task::spawn`] or [`Runtime::spawn`](crate::Runtime::spawn)
/// and should not be constructed directly in user code.
pub struct Task<T> {
    future: Mutex<Option<BoxFuture<T>>>,
    completion: Mutex<Completion<T>>,
    queue: Arc<TaskQueue>,
}

// Output slot plus the wakers of every JoinHandle waiting on it. Kept under one
// lock so a handle can never register after completion and miss its wake.
struct Completion<T> {
    result: Option<T>,
    done: bool,
    waiters: Vec<Waker>,
}

impl<T: Send + 'static> Task<T> {
    fn new<F>(fut: F, queue: Arc<TaskQueue>) -> Arc<Self>
    where
        F: Future<Output = T> + Send + 'static,
    {
        Arc::new(Task {
            future: Mutex::new(Some(Box::pin(fut))),
            completion: Mutex::new(Completion {
                result: None,
                done: false,
                waiters: Vec::new(),
            }),
            queue,
        })
    }

    /// Polls the task's future once.
    ///
    /// If the future is still pending it is stored back for the next wake.
    /// Once it completes, the output is stored and every waiting
    /// [`JoinHandle`] is woken. Polling a completed task does nothing.
    fn poll(self: &Arc<Self>) {
        let runnable: Arc<dyn Runnable> = self.clone();
        let waker = make_waker(runnable, self.queue.clone());
        let mut context = Context::from_waker(&waker);

        let mut future_slot = self.future.lock();

        if let Some(mut future) = future_slot.take() {
            match future.as_mut().poll(&mut context) {
                Poll::Pending => {
                    *future_slot = Some(future);
                }
                Poll::Ready(val) => {
                    drop(future_slot);

                    let waiters = {
                        let mut completion = self.completion.lock();
                        completion.result = Some(val);
                        completion.done = true;
                        std::mem::take(&mut completion.waiters)
                    };

                    for waker in waiters {
                        waker.wake();
                    }
                }
            }
        }
    }

    /// Spawns a task on the current runtime context and returns a [`JoinHandle`].
    ///
    /// # Panics
    /// Panics if called outside of [`Runtime::block_on`](crate::Runtime::block_on).
    ///
    /// # Example
    /// ```ignore
    /// async fn example() {
    ///     let handle = Task::spawn(async { "done" });
    ///     assert_eq!(handle.await, "done");
    /// }
    /// ```
    pub fn spawn<F>(future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        match Self::try_spawn(future) {
            Some(handle) => handle,
            None => panic!("Task::spawn() called outside of a runtime context"),
        }
    }

    /// Like [`Task::spawn`], but returns `None` instead of panicking when no
    /// runtime is driving the current thread.
    pub fn try_spawn<F>(future: F) -> Option<JoinHandle<T>>
    where
        F: Future<Output = T> + Send + 'static,
    {
        current_queue().map(|queue| Self::spawn_on(future, queue))
    }

    pub(crate) fn spawn_on<F>(future: F, queue: Arc<TaskQueue>) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let task = Task::new(future, queue.clone());
        queue.push(task.clone());

        JoinHandle { task }
    }
}

/// Trait for objects that can be polled as tasks by the executor.
///
/// Lets tasks with different output types share one queue.
pub(crate) trait Runnable: Send + Sync {
    fn run(self: Arc<Self>);
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::poll(&self);
    }
}

/// A future that resolves when the associated task completes, returning the
/// output value.
///
/// # Example
/// ```ignore
/// let handle: JoinHandle<i32> = Task::spawn(async { 42 });
/// let result = handle.await; // result: i32
/// ```
pub struct JoinHandle<T> {
    task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    /// Returns `true` once the task's future has completed.
    pub fn is_finished(&self) -> bool {
        self.task.completion.lock().done
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut completion = self.task.completion.lock();

        if completion.done {
            if let Some(result) = completion.result.take() {
                return Poll::Ready(result);
            }
            // Output already taken by an earlier poll of this handle.
            return Poll::Pending;
        }

        completion.waiters.push(cx.waker().clone());
        Poll::Pending
    }
}
