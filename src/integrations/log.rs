//! Promise-returning structured log helper.
//!
//! [`log_message`] validates its input, emits the record through `tracing`
//! and hands the record back. Error severity is deliberately loud in two
//! separate ways: the record is emitted as a `tracing` error event, and the
//! returned promise rejects with [`Error::Logged`].

use crate::error::Error;
use crate::promise::Promise;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Severity accepted by [`log_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Parses a level name, ignoring ASCII case. `warning` is accepted as an
    /// alias of `warn`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

/// A single structured log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Serializes the record as a single-line JSON object.
    pub fn to_json(&self) -> String {
        // A struct of a unit enum and a string always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Validates and emits a log record.
///
/// Rejects with [`Error::InvalidLevel`] for an unknown level and with
/// [`Error::InvalidArgument`] for a blank message, without emitting
/// anything. Otherwise the record is emitted at the matching `tracing`
/// level; for every level but `error` the promise fulfills with the record.
///
/// # Example
/// ```ignore
/// let record = log_message("info", "cache warmed").wait()?;
/// assert_eq!(record.to_string(), "[INFO] cache warmed");
///
/// let failed = log_message("error", "disk full").wait();
/// assert_eq!(failed, Err(Error::Logged("[ERROR] disk full".into())));
/// ```
pub fn log_message(level: &str, message: &str) -> Promise<LogRecord, Error> {
    Promise::new(|resolver| {
        let level: Level = level.parse()?;

        if message.trim().is_empty() {
            return Err(Error::InvalidArgument("log message is empty".into()));
        }

        let record = LogRecord::new(level, message);
        emit(&record);

        match level {
            Level::Error => Err(Error::Logged(record.to_string())),
            _ => {
                resolver.resolve(record);
                Ok(())
            }
        }
    })
}

fn emit(record: &LogRecord) {
    let message = record.message.as_str();

    match record.level {
        Level::Debug => tracing::debug!(target: "pledge::log", "{message}"),
        Level::Info => tracing::info!(target: "pledge::log", "{message}"),
        Level::Warn => tracing::warn!(target: "pledge::log", "{message}"),
        Level::Error => tracing::error!(target: "pledge::log", "{message}"),
    }
}
