//! Rejection reasons produced by the crate.
//!
//! [`Promise`](crate::Promise) is generic over its rejection type, but every
//! combinator and integration in this crate defaults to [`Error`]. Timing
//! failures are kept in their own [`TimeError`] so that callers with a custom
//! rejection type only need a `From<TimeError>` impl to use
//! [`timeout`](crate::time::timeout).

use std::time::Duration;

use thiserror::Error;

/// Failure raised by time-based combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The deadline elapsed before the wrapped promise settled.
    #[error("deadline of {0:?} elapsed")]
    TimeOut(Duration),
}

/// Default rejection reason for promises built by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A timer won the race against the wrapped operation.
    #[error(transparent)]
    Time(#[from] TimeError),

    /// A log severity outside of `debug`, `info`, `warn`, `error`.
    #[error("invalid log level `{0}`")]
    InvalidLevel(String),

    /// An argument failed validation before any work was attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A payload field is longer than the configured limit.
    #[error("{field} is {len} characters long, limit is {limit}")]
    LimitExceeded {
        field: &'static str,
        limit: usize,
        len: usize,
    },

    /// An error-severity record was logged.
    #[error("{0}")]
    Logged(String),

    /// An outbound delivery sink refused or failed to send a payload.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// The work queue no longer accepts jobs.
    #[error("work queue is closed")]
    QueueClosed,

    /// Free-form rejection reason.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Builds a free-form [`Error::Message`].
    pub fn msg(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// Returns `true` if this error was produced by an elapsed deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Time(TimeError::TimeOut(_)))
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::msg(message)
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Message(message)
    }
}
