//! Collaborators built on top of promises.
//!
//! These treat [`Promise`](crate::Promise) as a black box: they create
//! promises, chain them and reject them with [`Error`](crate::Error)
//! variants, but never reach into the state machine.

pub mod embed;
pub mod log;
pub mod webhook;
pub mod work_queue;

pub use embed::{Embed, EmbedLimits};
pub use log::{Level, LogRecord, log_message};
pub use webhook::{DeliverySink, Webhook, WebhookPayload};
pub use work_queue::{WorkQueue, WorkQueueBuilder};
