use crate::promise::Promise;

/// Settles with whichever input settles first, on whichever branch it
/// settled.
///
/// Later settlements are ignored by the result but are not suppressed
/// otherwise. With no inputs the result stays pending forever; wrap it in
/// [`timeout`](crate::time::timeout) if that matters.
///
/// # Example
/// ```ignore
/// let slow = delay::<Error>(Duration::from_millis(50)).map(|_| "slow");
/// let fast = Promise::resolved("fast");
/// assert_eq!(race(vec![slow, fast]).wait(), Ok("fast"));
/// ```
pub fn race<T, E, I>(promises: I) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<T, E>>,
{
    let (winner, resolver) = Promise::pending();

    for promise in promises {
        let resolver = resolver.clone();
        promise.subscribe(move |outcome| {
            resolver.settle(outcome);
        });
    }

    winner
}
