use crate::promise::Promise;

use parking_lot::Mutex;
use std::sync::Arc;

/// Callback registered with a [`Source`].
pub type Listener<P> = Box<dyn FnMut(P) + Send>;

/// Anything that can notify subscribers and later forget them.
///
/// Implementations must not hold internal locks while invoking listeners:
/// the bridges below unsubscribe from inside the listener itself.
pub trait Source {
    type Payload;
    type Subscription;

    fn subscribe(&self, callback: Listener<Self::Payload>) -> Self::Subscription;

    fn unsubscribe(&self, subscription: Self::Subscription);
}

enum Link<H> {
    Subscribing,
    Subscribed(H),
    Fired,
}

/// Resolves with the first payload `source` delivers, then unsubscribes.
///
/// Exactly one subscribe/unsubscribe pair is performed, even if the source
/// fires synchronously from within `subscribe`. Later notifications never
/// reach the promise. The listener only holds a weak reference to the
/// source, so an abandoned source is not kept alive by it.
///
/// # Example
/// ```ignore
/// let clicks = Arc::new(Emitter::new());
/// let first = from_callback_source::<_, Error>(clicks.clone());
/// clicks.emit("left");
/// assert_eq!(first.wait(), Ok("left"));
/// ```
pub fn from_callback_source<S, E>(source: Arc<S>) -> Promise<S::Payload, E>
where
    S: Source + Send + Sync + 'static,
    S::Payload: Clone + Send + 'static,
    S::Subscription: Send + 'static,
    E: Clone + Send + 'static,
{
    let (promise, resolver) = Promise::<S::Payload, E>::pending();
    let link = Arc::new(Mutex::new(Link::<S::Subscription>::Subscribing));

    let listener = {
        let link = link.clone();
        let weak = Arc::downgrade(&source);

        move |payload| {
            let previous = std::mem::replace(&mut *link.lock(), Link::Fired);

            match previous {
                Link::Fired => return,
                Link::Subscribed(subscription) => {
                    if let Some(source) = weak.upgrade() {
                        source.unsubscribe(subscription);
                    }
                }
                // Fired from inside `subscribe`; the caller unsubscribes.
                Link::Subscribing => {}
            }

            resolver.resolve(payload);
        }
    };

    let subscription = source.subscribe(Box::new(listener));

    let mut state = link.lock();
    if matches!(*state, Link::Subscribing) {
        *state = Link::Subscribed(subscription);
    } else {
        drop(state);
        source.unsubscribe(subscription);
    }

    promise
}

struct Gathered<P> {
    slots: Vec<Option<P>>,
    remaining: usize,
}

/// Resolves once every source has fired at least once, with each source's
/// first payload at that source's index.
///
/// Sources are never unsubscribed; anything they emit after the promise
/// settles is dropped. An empty input resolves immediately.
pub fn from_multiple_sources<S, E, I>(sources: I) -> Promise<Vec<S::Payload>, E>
where
    S: Source + 'static,
    S::Payload: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Arc<S>>,
{
    let sources: Vec<Arc<S>> = sources.into_iter().collect();

    if sources.is_empty() {
        return Promise::resolved(Vec::new());
    }

    let (promise, resolver) = Promise::<Vec<S::Payload>, E>::pending();
    let gathered = Arc::new(Mutex::new(Gathered {
        slots: vec![None; sources.len()],
        remaining: sources.len(),
    }));

    for (index, source) in sources.iter().enumerate() {
        let gathered = gathered.clone();
        let resolver = resolver.clone();

        let listener = move |payload| {
            let finished = {
                let mut gathered = gathered.lock();

                let Some(slot) = gathered.slots.get_mut(index) else {
                    return;
                };
                if slot.is_some() {
                    return;
                }
                *slot = Some(payload);
                gathered.remaining -= 1;

                if gathered.remaining == 0 {
                    Some(std::mem::take(&mut gathered.slots))
                } else {
                    None
                }
            };

            if let Some(slots) = finished {
                resolver.resolve(slots.into_iter().flatten().collect());
            }
        };

        // Subscriptions are intentionally kept for the lifetime of the source.
        let _ = source.subscribe(Box::new(listener));
    }

    promise
}
