use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future returned by [`yield_now`].
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited"]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Gives other ready tasks a turn before continuing.
///
/// The current task re-queues itself behind everything already queued on the
/// runtime and resumes on its next poll. Inside a long synchronous loop of
/// promise work this keeps spawned tasks and timer wake-ups from starving.
///
/// # Example
/// ```ignore
/// rt.block_on(async {
///     for chunk in chunks {
///         process(chunk);
///         yield_now().await;
///     }
/// });
/// ```
pub fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}
