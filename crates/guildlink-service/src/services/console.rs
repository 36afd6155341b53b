//! Console bridge
//!
//! Lets trusted members run server console commands by posting them in a
//! configured channel.

use std::path::Path;
use std::sync::Arc;

use guildlink_common::ConsoleChannelConfig;
use guildlink_core::{RemoteMessage, Snowflake};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use crate::local::LocalAction;

pub const RUN_REACTION: &str = "✅";
pub const ROLE_DENIED_REACTION: &str = "❌";
pub const COMMAND_DENIED_REACTION: &str = "⛔";

/// What to do with a message in a console channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleDecision {
    Ignore,
    /// Author holds none of the allowed roles
    RejectRole,
    /// Command name refused by the command list
    RejectCommand(String),
    Run(String),
}

/// One console channel
#[derive(Debug, Clone)]
pub struct ConsoleBridge {
    ctx: ServiceContext,
    config: Arc<ConsoleChannelConfig>,
}

impl ConsoleBridge {
    pub fn new(ctx: ServiceContext, config: ConsoleChannelConfig) -> Self {
        Self {
            ctx,
            config: Arc::new(config),
        }
    }

    pub fn channel(&self) -> Option<Snowflake> {
        self.config.channel()
    }

    /// Apply the channel's gating rules without side effects
    pub fn evaluate(&self, message: &RemoteMessage, self_id: Option<Snowflake>) -> ConsoleDecision {
        let config = &self.config;
        if !config.enabled || !config.allow_commands {
            return ConsoleDecision::Ignore;
        }
        if config.channel() != Some(message.channel_id) {
            return ConsoleDecision::Ignore;
        }
        if self_id == Some(message.author.id) {
            return ConsoleDecision::Ignore;
        }
        if config.block_bots && message.is_automated() {
            info!(author = %message.author.id, "Blocked console command from a bot");
            return ConsoleDecision::Ignore;
        }

        let command = message.content.trim();
        let Some(name) = command.split_whitespace().next() else {
            return ConsoleDecision::Ignore;
        };

        if !config.allowed_roles.is_empty()
            && !message
                .author_roles()
                .iter()
                .any(|r| config.allowed_roles.contains(r))
        {
            return ConsoleDecision::RejectRole;
        }

        let name = name.to_lowercase();
        let listed = config
            .command_list
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(&name));
        let permitted = if config.list_is_whitelist { listed } else { !listed };
        if !permitted {
            return ConsoleDecision::RejectCommand(name);
        }

        ConsoleDecision::Run(command.to_string())
    }

    /// Gate, log and queue a console command, then react with the verdict
    #[instrument(skip(self, message), fields(channel = %message.channel_id, author = %message.author.id))]
    pub async fn handle_message(&self, message: &RemoteMessage) -> ConsoleDecision {
        let remote = self.ctx.remote();
        let decision = self.evaluate(message, remote.self_user_id());

        let reaction = match &decision {
            ConsoleDecision::Ignore => return decision,
            ConsoleDecision::RejectRole => ROLE_DENIED_REACTION,
            ConsoleDecision::RejectCommand(name) => {
                info!(command = %name, "Console command refused");
                COMMAND_DENIED_REACTION
            }
            ConsoleDecision::Run(command) => {
                if self.config.log_commands {
                    self.append_log(message, command).await;
                }
                self.queue(message, command);
                info!(command = %command, "Console command queued");
                RUN_REACTION
            }
        };

        if let Err(e) = remote.add_reaction(message.channel_id, message.id, reaction).await {
            warn!(error = %e, "Could not react to console message");
        }
        decision
    }

    fn queue(&self, message: &RemoteMessage, command: &str) {
        let outbox = Arc::clone(self.ctx.outbox());
        let action = LocalAction::ConsoleCommand {
            command: command.to_string(),
            source: message.author.tag(),
            queued_at: self.ctx.clock().now(),
        };
        self.ctx
            .main_thread()
            .post(Box::new(move || outbox.push(action)));
    }

    async fn append_log(&self, message: &RemoteMessage, command: &str) {
        let line = format!(
            "[{} | ID {}] {}: {}\n",
            self.ctx.clock().now().format("%Y-%m-%d %H:%M:%S"),
            message.author.id,
            message.author.username,
            command
        );
        if let Err(e) = append_line(Path::new(&self.config.log_file_path), &line).await {
            warn!(path = %self.config.log_file_path, error = %e, "Could not write console log");
        }
    }
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}
