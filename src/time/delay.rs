use crate::promise::Promise;
use crate::timer;

use std::time::Duration;

/// Returns a promise that fulfills with `()` once `duration` has elapsed.
///
/// The promise never rejects; `E` only fixes the rejection type so the
/// result composes with other promises in a chain.
pub fn delay<E>(duration: Duration) -> Promise<(), E>
where
    E: Clone + Send + 'static,
{
    let (promise, resolver) = Promise::pending();

    timer::schedule(duration, move || {
        resolver.resolve(());
    });

    promise
}
