//! Time utilities: promise delays and timeouts, plus an async sleep.
//!
//! - [`delay`] returns a promise that fulfills after a duration
//! - [`timeout`] races a promise against a deadline
//! - [`sleep`] is a plain future for `async` code running on a [`Runtime`](crate::Runtime)
//!
//! All three are driven by the shared [timer service](crate::timer).
//!
//! # Example: Timeout
//!
//! ```ignore
//! use pledge::time::{delay, timeout};
//! use pledge::{Error, Promise};
//! use std::time::Duration;
//!
//! let slow = delay::<Error>(Duration::from_millis(100)).map(|_| "late");
//! let result = timeout(slow, Duration::from_millis(10)).wait();
//! assert!(matches!(result, Err(e) if e.is_timeout()));
//! ```

pub mod delay;
pub mod sleep;
pub mod timeout;

pub use crate::error::TimeError;
pub use delay::delay;
pub use sleep::sleep;
pub use timeout::timeout;
