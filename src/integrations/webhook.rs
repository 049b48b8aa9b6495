//! Outbound webhook messages.
//!
//! A [`Webhook`] validates a message, serializes it to JSON and hands the
//! body to a [`DeliverySink`]. How the body travels (HTTP client, queue,
//! test recorder) is entirely up to the sink.

use crate::combinator::all;
use crate::error::Error;
use crate::integrations::embed::{Embed, EmbedLimits};
use crate::promise::Promise;

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Destination for serialized webhook bodies.
pub trait DeliverySink: Send + Sync {
    /// Sends `body`. Rejections should use [`Error::Delivery`].
    fn deliver(&self, body: String) -> Promise<(), Error>;
}

impl<F> DeliverySink for F
where
    F: Fn(String) -> Promise<(), Error> + Send + Sync,
{
    fn deliver(&self, body: String) -> Promise<(), Error> {
        self(body)
    }
}

/// JSON body posted to the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

/// Sends messages through a [`DeliverySink`].
///
/// # Example
/// ```ignore
/// let hook = Webhook::new(|body: String| {
///     println!("POST {body}");
///     Promise::resolved(())
/// })
/// .username("deploy-bot");
///
/// hook.send(Some("deployed"), vec![Embed::new().title("v1.2.0")]).wait()?;
/// ```
pub struct Webhook<S> {
    sink: Arc<S>,
    username: Option<String>,
    limits: EmbedLimits,
}

impl<S: DeliverySink + 'static> Webhook<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
            username: None,
            limits: EmbedLimits::default(),
        }
    }

    /// Overrides the display name shown for messages from this webhook.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn limits(mut self, limits: EmbedLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Builds the payload for a message, checking message-level rules only.
    ///
    /// A message needs non-blank content or at least one embed, and may
    /// carry at most `limits.max_embeds` embeds.
    pub fn payload(
        &self,
        content: Option<&str>,
        embeds: Vec<Embed>,
    ) -> Result<WebhookPayload, Error> {
        let content = content.filter(|text| !text.trim().is_empty());

        if content.is_none() && embeds.is_empty() {
            return Err(Error::InvalidArgument(
                "webhook message needs content or at least one embed".into(),
            ));
        }

        if embeds.len() > self.limits.max_embeds {
            return Err(Error::LimitExceeded {
                field: "embeds",
                limit: self.limits.max_embeds,
                len: embeds.len(),
            });
        }

        Ok(WebhookPayload {
            content: content.map(str::to_string),
            username: self.username.clone(),
            embeds,
        })
    }

    /// Validates and delivers a message.
    ///
    /// Every embed is validated against the configured limits; the first
    /// violation rejects the send before anything reaches the sink.
    pub fn send(&self, content: Option<&str>, embeds: Vec<Embed>) -> Promise<(), Error> {
        let payload = match self.payload(content, embeds) {
            Ok(payload) => payload,
            Err(err) => return Promise::rejected(err),
        };

        let checks: Vec<Promise<(), Error>> = payload
            .embeds
            .iter()
            .map(|embed| embed.validate(&self.limits))
            .collect();

        let sink = self.sink.clone();

        all(checks)
            .then(move |_| {
                serde_json::to_string(&payload).map_err(|err| Error::InvalidArgument(err.to_string()))
            })
            .and_then(move |body| {
                debug!(bytes = body.len(), "delivering webhook payload");
                sink.deliver(body)
            })
    }
}
