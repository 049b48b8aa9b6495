//! Thread-local runtime context used for global task spawning.
//!
//! [`Runtime::block_on`](crate::Runtime::block_on) installs its task queue in
//! thread-local storage for the duration of the call. This is what lets
//! [`Task::spawn`](crate::Task::spawn), [`Promise::from_future`](crate::Promise::from_future)
//! and [`wrap_async`](crate::bridge::wrap_async) find a runtime without being
//! handed one explicitly.
//!
//! # Example
//!
//! ```ignore
//! use pledge::{Runtime, Task, in_runtime};
//!
//! assert!(!in_runtime());
//! Runtime::new().block_on(async {
//!     assert!(in_runtime());
//!     Task::spawn(async {});
//! });
//! ```

use crate::runtime::queue::TaskQueue;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Thread-local storage for the current runtime's task queue.
    ///
    /// Set by [`enter_context`] at the start of every `block_on`.
    pub(crate) static CURRENT_QUEUE: RefCell<Option<Arc<TaskQueue>>> = const { RefCell::new(None) };
}

/// Enters a runtime context for the current thread.
///
/// Sets `queue` as the current task queue, runs `function`, then restores
/// whatever context was active before, so nested `block_on` calls on
/// different runtimes unwind correctly.
pub(crate) fn enter_context<F, R>(queue: Arc<TaskQueue>, function: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = CURRENT_QUEUE.with(|current| current.borrow_mut().replace(queue));

    let result = function();

    CURRENT_QUEUE.with(|current| *current.borrow_mut() = previous);

    result
}

/// Returns the task queue of the runtime driving this thread, if any.
pub(crate) fn current_queue() -> Option<Arc<TaskQueue>> {
    CURRENT_QUEUE.with(|current| current.borrow().clone())
}

/// Returns `true` when called from inside `Runtime::block_on`.
pub fn in_runtime() -> bool {
    current_queue().is_some()
}
