//! Runtime subsystem modules.

pub(crate) mod context;
mod core;
pub(crate) mod executor;
pub(crate) mod queue;
pub(crate) mod waker;
pub(crate) mod yield_now;

pub(crate) use context::enter_context;
pub use core::Runtime;
pub(crate) use executor::Executor;
pub(crate) use queue::TaskQueue;
pub(crate) use waker::make_waker;
pub use yield_now::{YieldNow, yield_now};
