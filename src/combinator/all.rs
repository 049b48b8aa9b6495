use crate::promise::Promise;

use parking_lot::Mutex;
use std::sync::Arc;

// Slots filled in input order, whatever order the inputs settle in.
struct Collected<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
}

/// Waits for every promise and fulfills with their values in input order.
///
/// Rejects with the first rejection reason observed; other inputs are left
/// running but no longer affect the result. An empty input fulfills
/// immediately with an empty vector.
///
/// # Example
/// ```ignore
/// let both = all(vec![Promise::<u8>::resolved(1), Promise::resolved(2)]);
/// assert_eq!(both.wait(), Ok(vec![1, 2]));
/// ```
pub fn all<T, E, I>(promises: I) -> Promise<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
{
    let promises: Vec<Promise<T, E>> = promises.into_iter().collect();

    if promises.is_empty() {
        return Promise::resolved(Vec::new());
    }

    let (aggregate, resolver) = Promise::<Vec<T>, E>::pending();
    let collected = Arc::new(Mutex::new(Collected {
        slots: vec![None; promises.len()],
        remaining: promises.len(),
    }));

    for (index, promise) in promises.into_iter().enumerate() {
        let collected = collected.clone();
        let resolver = resolver.clone();

        promise.subscribe(move |outcome| match outcome {
            Ok(value) => {
                let finished = {
                    let mut collected = collected.lock();
                    collected.slots[index] = Some(value);
                    collected.remaining -= 1;

                    if collected.remaining == 0 {
                        Some(std::mem::take(&mut collected.slots))
                    } else {
                        None
                    }
                };

                if let Some(slots) = finished {
                    resolver.resolve(slots.into_iter().flatten().collect());
                }
            }
            Err(reason) => {
                resolver.reject(reason);
            }
        });
    }

    aggregate
}

/// Waits for every promise like [`all`], then keeps the values matching
/// `predicate`, preserving their relative order.
///
/// A rejection from any input rejects the result with the same reason.
pub fn filter<T, E, I, P>(promises: I, predicate: P) -> Promise<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
    P: Fn(&T) -> bool + Send + 'static,
{
    all(promises).map(move |values| values.into_iter().filter(|value| predicate(value)).collect())
}
