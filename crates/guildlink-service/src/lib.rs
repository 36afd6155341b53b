//! # guildlink-service
//!
//! Application layer: the link service, role synchronizer, webhook notifier,
//! chat relay, console bridge, and bug reports, plus the local game-server
//! boundary (main loop, presence, outbox).

pub mod dto;
pub mod local;
pub mod services;
pub mod webhook;

#[cfg(test)]
mod testing;

pub use local::{LocalAction, LocalOutbox, MainLoop, OnlinePlayer, PresenceRegistry};
pub use services::{
    BugReportService, ChatRelay, ConsoleBridge, ConsoleDecision, IssuedCode, LinkNotifier,
    LinkService, RoleSynchronizer, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SkipReason, SyncOutcome, VerificationHandler, VerifyOutcome,
};
pub use webhook::{WebhookError, WebhookMessage, WebhookSender};
