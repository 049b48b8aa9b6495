//! Bridges from callback-style and plain functions into promises.
//!
//! - [`from_callback_source`] and [`from_multiple_sources`] adapt any
//!   [`Source`] (subscribe/unsubscribe notification API) into a promise
//! - [`Emitter`] is a ready-made [`Source`]
//! - [`wrap`], [`wrap_async`], [`attempt`] and [`try_fn`] lift fallible
//!   functions into promise-returning ones

pub mod emitter;
pub mod source;
pub mod wrap;

pub use emitter::{Emitter, Subscription};
pub use source::{Listener, Source, from_callback_source, from_multiple_sources};
pub use wrap::{attempt, try_fn, wrap, wrap_async};
