//! Combinators that compose promises into new promises.
//!
//! - [`all`] and [`filter`] aggregate many promises into one ordered result
//! - [`race`] settles with whichever input settles first
//! - [`retry`], [`retry_with_delay`] and [`repeat_until_success`] re-run a
//!   promise factory after failures
//!
//! None of them cancel anything. An input that loses a race, or is still
//! pending when `all` rejects, keeps running; only its effect on the
//! combined promise is dropped.

pub mod all;
pub mod race;
pub mod retry;

pub use all::{all, filter};
pub use race::race;
pub use retry::{repeat_until_success, retry, retry_with_delay};
