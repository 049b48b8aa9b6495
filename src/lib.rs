//! Single-settlement promises and the combinators built on them.
//!
//! This crate provides a [`Promise`] type that is settled exactly once,
//! either fulfilled or rejected, and a library of combinators for chaining,
//! recovering, aggregating, racing, retrying, delaying and timing out
//! promises. A small async runtime is included to drive `async` code and to
//! `.await` promises.
//!
//! # Architecture
//!
//! - **Promise**: the state machine, its resolver and the `then` family
//! - **Combinators**: `all`, `filter`, `race`, `retry` and friends
//! - **Time**: `delay`, `timeout` and `sleep`, driven by the timer service
//! - **Timer**: a lazily started driver thread running deadline callbacks
//! - **Bridge**: adapters from callback sources and plain functions
//! - **Runtime**: `block_on`, task spawning, `yield_now` and wakers
//! - **RuntimeBuilder**: fluent builder for runtime configuration
//! - **Integrations**: logging, embed validation, webhooks and a work queue
//!
//! # Example
//!
//! ```ignore
//! use pledge::{Error, Promise, Runtime, all, time::timeout};
//! use std::time::Duration;
//!
//! let mut rt = Runtime::new();
//! let values = rt.block_on(timeout(
//!     all(vec![Promise::<u32>::resolved(1), Promise::resolved(2)]),
//!     Duration::from_secs(1),
//! ));
//! assert_eq!(values, Ok(vec![1, 2]));
//! ```

mod builder;
mod runtime;
mod task;
mod utils;

pub mod bridge;
pub mod combinator;
pub mod error;
pub mod integrations;
pub mod promise;
pub mod time;
pub mod timer;

pub use bridge::{
    Emitter, Source, attempt, from_callback_source, from_multiple_sources, try_fn, wrap,
    wrap_async,
};
pub use builder::RuntimeBuilder;
pub use combinator::{all, filter, race, repeat_until_success, retry, retry_with_delay};
pub use error::{Error, TimeError};
pub use promise::{Promise, PromiseState, Resolver};
pub use runtime::{Runtime, YieldNow, yield_now};
pub use runtime::context::in_runtime;
pub use task::{JoinHandle, Task};
pub use time::{delay, sleep, timeout};
