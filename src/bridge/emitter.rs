use crate::bridge::source::{Listener, Source};
use crate::utils::slab::Slab;

use parking_lot::Mutex;
use std::fmt;

/// Handle returned by [`Emitter::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    key: usize,
    id: u64,
}

struct Slot<P> {
    id: u64,
    // `None` while the callback is running outside of the lock.
    callback: Option<Listener<P>>,
}

struct Registry<P> {
    slots: Slab<Slot<P>>,
    next_id: u64,
}

/// A multi-listener notification source.
///
/// Listeners are invoked outside of the registry lock, so a listener may
/// subscribe or unsubscribe (itself included) while an emission is in
/// progress. Listeners added during an emission first hear the next one.
pub struct Emitter<P> {
    registry: Mutex<Registry<P>>,
}

impl<P> Emitter<P> {
    /// Creates an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                slots: Slab::new(),
                next_id: 0,
            }),
        }
    }

    /// Registers a listener and returns the handle that removes it.
    pub fn subscribe(&self, callback: Listener<P>) -> Subscription {
        let mut registry = self.registry.lock();

        let id = registry.next_id;
        registry.next_id += 1;

        let key = registry.slots.insert(Slot {
            id,
            callback: Some(callback),
        });

        Subscription { key, id }
    }

    /// Removes a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut registry = self.registry.lock();

        let current = registry
            .slots
            .get_mut(subscription.key)
            .is_some_and(|slot| slot.id == subscription.id);

        current && registry.slots.remove(subscription.key).is_some()
    }

    /// Number of registered listeners.
    pub fn listeners(&self) -> usize {
        self.registry.lock().slots.len()
    }
}

impl<P: Clone> Emitter<P> {
    /// Delivers `payload` to every listener registered when the call starts.
    ///
    /// Returns how many listeners were invoked.
    pub fn emit(&self, payload: P) -> usize {
        let keys = self.registry.lock().slots.keys();
        let mut delivered = 0;

        for key in keys {
            let taken = {
                let mut registry = self.registry.lock();
                registry
                    .slots
                    .get_mut(key)
                    .and_then(|slot| slot.callback.take().map(|callback| (slot.id, callback)))
            };

            let Some((id, mut callback)) = taken else {
                continue;
            };

            callback(payload.clone());
            delivered += 1;

            let mut registry = self.registry.lock();
            if let Some(slot) = registry.slots.get_mut(key)
                && slot.id == id
            {
                slot.callback = Some(callback);
            }
        }

        delivered
    }
}

impl<P> Default for Emitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Emitter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners())
            .finish()
    }
}

impl<P: Clone + Send + 'static> Source for Emitter<P> {
    type Payload = P;
    type Subscription = Subscription;

    fn subscribe(&self, callback: Listener<P>) -> Subscription {
        Emitter::subscribe(self, callback)
    }

    fn unsubscribe(&self, subscription: Subscription) {
        Emitter::unsubscribe(self, subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn emit_reaches_every_listener() {
        let emitter = Emitter::new();
        let total = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let total = total.clone();
            emitter.subscribe(Box::new(move |n: usize| {
                total.fetch_add(n, Ordering::SeqCst);
            }));
        }

        assert_eq!(emitter.emit(2), 3);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn stale_subscription_does_not_remove_reused_slot() {
        let emitter: Emitter<()> = Emitter::new();
        let first = emitter.subscribe(Box::new(|_| {}));
        assert!(emitter.unsubscribe(first));

        let second = emitter.subscribe(Box::new(|_| {}));
        assert!(!emitter.unsubscribe(first));
        assert_eq!(emitter.listeners(), 1);
        assert!(emitter.unsubscribe(second));
        assert_eq!(emitter.emit(()), 0);
    }

    #[test]
    fn listener_can_unsubscribe_itself_mid_emit() {
        let emitter = Arc::new(Emitter::new());
        let handle = Arc::new(parking_lot::Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let subscription = {
            let emitter = emitter.clone();
            let handle = handle.clone();
            let calls = calls.clone();
            emitter.clone().subscribe(Box::new(move |_: u8| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(subscription) = handle.lock().take() {
                    emitter.unsubscribe(subscription);
                }
            }))
        };
        *handle.lock() = Some(subscription);

        assert_eq!(emitter.emit(1), 1);
        assert_eq!(emitter.emit(2), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
