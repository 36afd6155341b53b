//! Outbound webhook delivery
//!
//! Link notifications, chat relay lines and bug reports all leave through
//! the same fire-and-forget sender.

mod payload;
mod sender;

pub use payload::{parse_hex_color, AllowedMentions, Embed, EmbedField, WebhookMessage};
pub use sender::{WebhookError, WebhookSender};
