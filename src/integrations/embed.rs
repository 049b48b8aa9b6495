//! Rich message embeds and their size limits.

use crate::error::Error;
use crate::promise::Promise;

use serde::Serialize;

/// Maximum characters in an embed title.
pub const TITLE_LIMIT: usize = 256;
/// Maximum characters in an embed description.
pub const DESCRIPTION_LIMIT: usize = 4086;
/// Maximum embeds carried by one webhook message.
pub const MAX_EMBEDS: usize = 10;

/// Size limits applied by [`Embed::validate`] and the webhook sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedLimits {
    pub title: usize,
    pub description: usize,
    pub max_embeds: usize,
}

impl Default for EmbedLimits {
    fn default() -> Self {
        Self {
            title: TITLE_LIMIT,
            description: DESCRIPTION_LIMIT,
            max_embeds: MAX_EMBEDS,
        }
    }
}

/// A rich message attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Checks the embed against `limits`, counting characters rather than
    /// bytes.
    ///
    /// Fulfills with `()` when every field fits, otherwise rejects with
    /// [`Error::LimitExceeded`] naming the first offending field.
    pub fn validate(&self, limits: &EmbedLimits) -> Promise<(), Error> {
        match self.check(limits) {
            Ok(()) => Promise::resolved(()),
            Err(err) => Promise::rejected(err),
        }
    }

    pub(crate) fn check(&self, limits: &EmbedLimits) -> Result<(), Error> {
        check_field("title", self.title.as_deref(), limits.title)?;
        check_field("description", self.description.as_deref(), limits.description)
    }
}

fn check_field(field: &'static str, value: Option<&str>, limit: usize) -> Result<(), Error> {
    let len = value.map_or(0, |value| value.chars().count());

    if len > limit {
        return Err(Error::LimitExceeded { field, limit, len });
    }

    Ok(())
}
