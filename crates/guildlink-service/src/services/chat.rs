//! Chat relay
//!
//! Mirrors game chat and join/leave lines to the chat webhook.

use guildlink_common::Placeholders;
use guildlink_core::PlayerId;
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use crate::dto::RelayChatRequest;
use crate::webhook::WebhookMessage;

pub struct ChatRelay<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatRelay<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Relay one chat line. `Ok(false)` when relaying is off for it.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` for an unknown chat channel
    #[instrument(skip(self, request), fields(player = %request.player_id))]
    pub fn relay_chat(&self, request: &RelayChatRequest) -> ServiceResult<bool> {
        let chat = &self.ctx.config().chat;
        if !chat.enabled {
            return Ok(false);
        }

        let name = request.channel.as_deref().unwrap_or(&chat.default_channel);
        let channel = chat
            .resolve_channel(name)
            .ok_or_else(|| ServiceError::not_found("Chat channel", name))?;
        if !channel.enabled {
            return Ok(false);
        }

        let permission = channel.permission.trim();
        if !permission.is_empty() && !self.ctx.directory().has_group(request.player_id, permission) {
            debug!(channel = %channel.name, "Player lacks the channel group");
            return Ok(false);
        }

        let content = render_chat_line(&channel.message_format, request);
        self.send(content);
        Ok(true)
    }

    pub fn relay_join(&self, player: PlayerId, player_name: &str) -> bool {
        let chat = &self.ctx.config().chat;
        self.relay_presence(player, player_name, &chat.join_format)
    }

    pub fn relay_leave(&self, player: PlayerId, player_name: &str) -> bool {
        let chat = &self.ctx.config().chat;
        self.relay_presence(player, player_name, &chat.leave_format)
    }

    fn relay_presence(&self, player: PlayerId, player_name: &str, template: &str) -> bool {
        let chat = &self.ctx.config().chat;
        if !chat.enabled || !chat.send_join_leave || template.trim().is_empty() {
            return false;
        }
        debug!(player = %player, "Relaying presence change");
        self.send(Placeholders::new().with("player", player_name).render(template));
        true
    }

    fn send(&self, content: String) {
        let settings = &self.ctx.config().chat.webhook;
        self.ctx.webhook().send(settings, WebhookMessage::new(content));
    }
}

fn render_chat_line(template: &str, request: &RelayChatRequest) -> String {
    let (x, y, z) = request
        .location
        .map(|l| l.rounded())
        .map_or((String::new(), String::new(), String::new()), |(x, y, z)| {
            (x.to_string(), y.to_string(), z.to_string())
        });

    Placeholders::new()
        .with("player", &request.player_name)
        .with(
            "displayname",
            request.display_name.as_deref().unwrap_or(&request.player_name),
        )
        .with("message", &request.message)
        .with("world", request.world.as_deref().unwrap_or_default())
        .with("x", x)
        .with("y", y)
        .with("z", z)
        .render(template)
}
