//! `.await` support for promises.

use crate::promise::Promise;

use parking_lot::Mutex;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// Future returned by `Promise::into_future`, resolving to the promise's
/// outcome.
///
/// The first poll registers a single reaction on the promise. Later polls
/// only swap the stored waker, so repeated polling never grows the
/// promise's reaction registry.
pub struct Settled<T, E> {
    promise: Promise<T, E>,
    waker: Option<Arc<Mutex<Option<Waker>>>>,
}

impl<T, E> Settled<T, E> {
    pub(crate) fn new(promise: Promise<T, E>) -> Self {
        Self {
            promise,
            waker: None,
        }
    }
}

impl<T, E> Future for Settled<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(outcome) = this.promise.peek() {
            return Poll::Ready(outcome);
        }

        match &this.waker {
            Some(slot) => {
                *slot.lock() = Some(cx.waker().clone());
            }
            None => {
                let slot = Arc::new(Mutex::new(Some(cx.waker().clone())));
                let notify = slot.clone();

                this.promise.subscribe(move |_| {
                    if let Some(waker) = notify.lock().take() {
                        waker.wake();
                    }
                });
                this.waker = Some(slot);
            }
        }

        // The promise may have settled while the waker was being swapped.
        match this.promise.peek() {
            Some(outcome) => Poll::Ready(outcome),
            None => Poll::Pending,
        }
    }
}

impl<T, E> IntoFuture for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = Settled<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        Settled::new(self)
    }
}
