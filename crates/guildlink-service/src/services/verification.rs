//! Verification channel handler
//!
//! Watches the verification channel for messages that look like a code and
//! answers each attempt with a reaction and a short-lived reply.

use std::time::Duration;

use guildlink_common::Placeholders;
use guildlink_core::{is_well_formed_code, RemoteMessage};
use tracing::{debug, error, instrument, warn};

use super::context::ServiceContext;
use super::link::{LinkService, VerifyOutcome};

pub const ACCEPTED_REACTION: &str = "✅";
pub const REJECTED_REACTION: &str = "❌";

/// Handles messages posted in the verification channel
#[derive(Debug, Clone)]
pub struct VerificationHandler {
    ctx: ServiceContext,
}

impl VerificationHandler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns `None` when the message was not a verification attempt
    #[instrument(skip(self, message), fields(author = %message.author.id))]
    pub async fn handle_message(&self, message: &RemoteMessage) -> Option<VerifyOutcome> {
        if message.is_automated() {
            return None;
        }

        let code = message.content.trim();
        if !is_well_formed_code(code, self.ctx.config().link.code_length) {
            debug!("Ignoring non-code message");
            return None;
        }

        let outcome = self.verify_blocking(code, message).await?;
        let accepted = outcome.is_accepted();

        let remote = self.ctx.remote();
        let reaction = if accepted { ACCEPTED_REACTION } else { REJECTED_REACTION };
        if let Err(e) = remote.add_reaction(message.channel_id, message.id, reaction).await {
            warn!(error = %e, "Could not react to verification message");
        }

        if accepted {
            if let Err(e) = remote.delete_message(message.channel_id, message.id).await {
                warn!(error = %e, "Could not delete verification message");
            }
        }

        self.reply(message, code, accepted).await;
        Some(outcome)
    }

    /// A successful link flushes the snapshot to disk, so the check runs on
    /// the blocking pool instead of a runtime worker
    async fn verify_blocking(&self, code: &str, message: &RemoteMessage) -> Option<VerifyOutcome> {
        let ctx = self.ctx.clone();
        let code = code.to_string();
        let author = message.author.clone();

        let task = tokio::task::spawn_blocking(move || {
            LinkService::new(&ctx).verify_code(&code, author.id, &author.tag())
        });
        match task.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(error = %e, "Verification task failed");
                None
            }
        }
    }

    async fn reply(&self, message: &RemoteMessage, code: &str, accepted: bool) {
        let messages = &self.ctx.config().bot.messages;
        let template = if accepted { &messages.success } else { &messages.failure };
        if template.trim().is_empty() {
            return;
        }

        let text = Placeholders::new()
            .with("player", message.author.display_name())
            .with("code", code)
            .render(template);

        let reply = match self.ctx.remote().send_message(message.channel_id, &text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Could not post verification reply");
                return;
            }
        };

        let ctx = self.ctx.clone();
        let delay = Duration::from_secs(messages.reply_delete_after_secs);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = ctx.remote().delete_message(reply.channel_id, reply.id).await {
                debug!(error = %e, "Verification reply already gone");
            }
        });
    }
}
