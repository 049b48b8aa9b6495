use crate::timer::{self, TimerId};

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// A future that completes after a specified duration.
///
/// Registers a wake-up with the timer service on the first poll and yields
/// `Poll::Pending` until the deadline passes. Dropping an unfinished sleep
/// cancels its timer. A duration too large to represent as a deadline never
/// completes.
#[derive(Debug)]
pub struct Sleep {
    deadline: Option<Instant>,
    timer: Option<TimerId>,
}

impl Sleep {
    /// Creates a new sleep future with the given duration.
    pub fn new(duration: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(duration),
            timer: None,
        }
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(deadline) = self.deadline else {
            return Poll::Pending;
        };

        let now = Instant::now();
        if now >= deadline {
            return Poll::Ready(());
        }

        // Register with the timer service on first poll only
        if self.timer.is_none() {
            let waker = cx.waker().clone();
            let id = timer::schedule(deadline - now, move || waker.wake());
            self.timer = Some(id);
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            timer::cancel(id);
        }
    }
}

/// Sleeps for the specified duration.
///
/// # Example
/// ```ignore
/// use pledge::time::sleep;
/// use std::time::Duration;
///
/// async {
///     sleep(Duration::from_millis(100)).await;
///     println!("Woke up after 100ms");
/// };
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}
