//! Link lifecycle notifications over webhook

use guildlink_common::{LinkMessages, Placeholders};
use guildlink_core::LinkEvent;
use tracing::debug;

use super::context::ServiceContext;
use crate::webhook::{Embed, WebhookMessage};

const LINKED_COLOR: u32 = 0x57_f287;
const UNLINKED_COLOR: u32 = 0xed_4245;

/// Announces link and unlink events on the configured link webhook
pub struct LinkNotifier<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LinkNotifier<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fire and forget. No-op when the link webhook is inactive.
    pub fn notify(&self, event: &LinkEvent) {
        let settings = &self.ctx.config().link.webhook;
        if !settings.is_active() {
            debug!(event = event.event_name(), "Link webhook inactive");
            return;
        }
        self.ctx.webhook().send(settings, build_message(event, &self.ctx.config().link.messages));
    }
}

/// Renders the configured player-facing text as the content and embed description
pub(crate) fn build_message(event: &LinkEvent, messages: &LinkMessages) -> WebhookMessage {
    let record = event.record();
    let remote = format!("{} ({})", record.remote_name, record.remote_id.user_mention());

    let template = match event {
        LinkEvent::Linked { .. } => &messages.link_confirmed,
        LinkEvent::Unlinked { .. } => &messages.link_revoked,
    };
    let text = Placeholders::new()
        .with("remote", &record.remote_name)
        .with("player", &record.player_name)
        .render(template);

    let mut embed = match event {
        LinkEvent::Linked { record, replaced } => {
            let mut embed = Embed {
                color: Some(LINKED_COLOR),
                ..Embed::titled("Account linked")
            }
            .field("Player", &record.player_name, true)
            .field("Remote", remote, true)
            .field("Linked at", format_time(record.linked_at), false);
            if *replaced {
                embed = embed.field("Replaced", "a previous link", true);
            }
            embed
        }
        LinkEvent::Unlinked { record, at } => Embed {
            color: Some(UNLINKED_COLOR),
            ..Embed::titled("Account unlinked")
        }
        .field("Player", &record.player_name, true)
        .field("Remote", remote, true)
        .field("Unlinked at", format_time(*at), false),
    };

    if !text.trim().is_empty() {
        embed.description = Some(text.clone());
    }
    WebhookMessage::new(text).with_embed(embed)
}

fn format_time(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
