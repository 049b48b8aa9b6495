//! Fluent builder for Runtime construction.
//!
//! Provides a builder pattern interface for creating and configuring Runtime instances.

use crate::runtime::Runtime;

/// Default number of queued tasks run between two polls of the main future.
pub const DEFAULT_EVENT_INTERVAL: usize = 61;

/// Builder for constructing Runtime instances with fluent API.
///
/// # Example
/// ```ignore
/// let rt = RuntimeBuilder::new().event_interval(16).build();
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    event_interval: usize,
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeBuilder {
    /// Creates a new runtime builder with default settings.
    pub fn new() -> Self {
        Self {
            event_interval: DEFAULT_EVENT_INTERVAL,
        }
    }

    /// Sets how many spawned tasks may run before the main future is polled
    /// again.
    ///
    /// Lower values make the main future more responsive when many tasks are
    /// ready; zero is treated as one.
    pub fn event_interval(mut self, tasks: usize) -> Self {
        self.event_interval = tasks;
        self
    }

    /// Builds and returns a configured Runtime instance.
    ///
    /// # Example
    /// ```ignore
    /// let rt = RuntimeBuilder::new().build();
    /// ```
    pub fn build(self) -> Runtime {
        Runtime::with_event_interval(self.event_interval)
    }
}
