use crate::promise::Promise;
use crate::task::Task;

use std::future::Future;

/// Lifts a fallible function into one that returns a promise.
///
/// The returned function runs `f` synchronously on every call: `Ok` becomes
/// a fulfilled promise and `Err` a rejected one. Functions of several
/// arguments take them as a tuple.
///
/// # Example
/// ```ignore
/// let parse = wrap(|text: &'static str| text.parse::<u32>().map_err(|e| Error::msg(e.to_string())));
/// assert_eq!(parse("12").wait(), Ok(12));
/// assert!(parse("twelve").wait().is_err());
/// ```
pub fn wrap<A, T, E, F>(f: F) -> impl Fn(A) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: Fn(A) -> Result<T, E>,
{
    move |args| {
        Promise::<T, E>::new(|resolver| {
            resolver.resolve(f(args)?);
            Ok(())
        })
    }
}

/// Lifts an async fallible function into one that returns a promise.
///
/// Each call spawns the produced future on the current runtime and settles
/// the promise with its output.
///
/// # Panics
/// The returned function panics when called outside of
/// [`Runtime::block_on`](crate::Runtime::block_on).
pub fn wrap_async<A, T, E, F, Fut>(f: F) -> impl Fn(A) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    move |args| Promise::from_future(f(args))
}

/// Runs `f` once and returns a promise of its result.
pub fn attempt<T, E, F>(f: F) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnOnce() -> Result<T, E>,
{
    Promise::<T, E>::new(move |resolver| {
        resolver.resolve(f()?);
        Ok(())
    })
}

/// Runs `f` once; rejects with its error, or fulfills with **`f` itself**.
///
/// On success the promise carries the function, not the value it returned.
/// Existing callers rely on getting the callable back (for instance to run
/// it again once it is known to work), so this is kept as is. Use
/// [`attempt`] to get the return value instead.
///
/// # Example
/// ```ignore
/// let probe = || Ok::<_, Error>(7);
/// let same = try_fn(probe).wait().unwrap();
/// assert_eq!(same(), Ok(7));
/// ```
pub fn try_fn<F, U, E>(f: F) -> Promise<F, E>
where
    F: Fn() -> Result<U, E> + Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    Promise::<F, E>::new(move |resolver| {
        f()?;
        resolver.resolve(f);
        Ok(())
    })
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Spawns `future` on the current runtime and settles with its output.
    ///
    /// # Panics
    /// Panics if called outside of [`Runtime::block_on`](crate::Runtime::block_on).
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (promise, resolver) = Self::pending();

        Task::spawn(async move {
            resolver.settle(future.await);
        });

        promise
    }
}
