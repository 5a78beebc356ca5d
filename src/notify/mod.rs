//! Webhook notification layer.
//!
//! Builds chat-platform embed payloads from listings and delivers them with
//! retry/backoff.

mod embed;
mod webhook;

pub use embed::{
    build_payload, Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedImage, WebhookPayload,
};
pub use webhook::WebhookClient;
