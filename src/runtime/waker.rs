//! Waker implementations for task and main-future wake-up notifications.
//!
//! Both wakers are built on [`futures::task::ArcWake`], so the raw vtable
//! plumbing is handled by `futures` rather than written by hand.

use crate::runtime::TaskQueue;
use crate::task::Runnable;

use futures::task::{ArcWake, waker};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::Waker;
use std::thread::{self, Thread};

/// Waker that re-queues its task when awakened.
struct TaskWaker {
    task: Arc<dyn Runnable>,
    queue: Arc<TaskQueue>,
}

impl ArcWake for TaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.queue.push(arc_self.task.clone());
    }
}

/// Creates a Waker that pushes `task` back onto `queue` when called.
pub(crate) fn make_waker(task: Arc<dyn Runnable>, queue: Arc<TaskQueue>) -> Waker {
    waker(Arc::new(TaskWaker { task, queue }))
}

/// Waker for the future passed to `block_on`.
///
/// Sets a notification flag and unparks the blocked thread, so a wake coming
/// from another thread is never lost between polling and parking.
pub(crate) struct MainWaker {
    notified: AtomicBool,
    thread: Thread,
}

impl MainWaker {
    pub(crate) fn for_current_thread() -> Arc<Self> {
        Arc::new(Self {
            notified: AtomicBool::new(false),
            thread: thread::current(),
        })
    }

    /// Clears and returns the notification flag.
    pub(crate) fn take_notified(&self) -> bool {
        self.notified.swap(false, Ordering::AcqRel)
    }
}

impl ArcWake for MainWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.notified.store(true, Ordering::Release);
        arc_self.thread.unpark();
    }
}
