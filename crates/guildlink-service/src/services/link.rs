//! Link service
//!
//! Issues verification codes to players and turns a code typed into the
//! verification channel into a durable link.

use chrono::{DateTime, Utc};
use guildlink_common::{format_duration, Placeholders};
use guildlink_core::{LinkEvent, LinkRecord, PendingLink, PlayerId, Snowflake};
use guildlink_store::{AppliedLink, LinkConflict};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::notify::LinkNotifier;
use super::roles::RoleSynchronizer;
use crate::local::LocalAction;

/// A code handed to a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedCode {
    pub code: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    /// The player already had a live code and got it back unchanged
    pub reused: bool,
}

/// Result of checking a code posted in the verification channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Accepted(LinkRecord),
    NotFound,
    Expired,
    /// The remote account is linked to another player
    RemoteAlreadyLinked,
    /// The player is linked and overwriting is disabled
    AlreadyLinked,
}

impl VerifyOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "accepted",
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::RemoteAlreadyLinked => "remote_already_linked",
            Self::AlreadyLinked => "already_linked",
        }
    }
}

/// Link service
pub struct LinkService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LinkService<'a> {
    /// Create a new LinkService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Hand a player a verification code.
    ///
    /// Expired codes of every player are swept first. A player with a live
    /// code gets that code back; otherwise a fresh one is minted.
    #[instrument(skip(self, player_name))]
    pub fn issue_code(&self, player: PlayerId, player_name: &str) -> IssuedCode {
        let store = self.ctx.link_store();
        let now = self.ctx.clock().now();

        store.cleanup_expired(now);

        if let Some(existing) = store.find_pending_by_player(player).filter(|p| p.is_live(now)) {
            return IssuedCode {
                code: existing.code,
                expires_at: existing.expires_at,
                reused: true,
            };
        }

        let link_config = &self.ctx.config().link;
        let code = self.ctx.codes().generate(link_config.code_length);
        let pending = PendingLink::new(
            code.clone(),
            player,
            player_name,
            now,
            link_config.code_validity(),
        );
        let expires_at = pending.expires_at;

        store.save_pending(pending);
        store.record_code_generated();

        info!(player = %player, expires_at = %expires_at, "Verification code issued");

        IssuedCode {
            code,
            expires_at,
            reused: false,
        }
    }

    /// Player-facing text for an issued code
    pub fn describe_code(&self, issued: &IssuedCode) -> String {
        let messages = &self.ctx.config().link.messages;
        if issued.reused {
            let remaining = issued.expires_at - self.ctx.clock().now();
            Placeholders::new()
                .with("code", &issued.code)
                .with("duration", format_duration(remaining))
                .render(&messages.pending_exists)
        } else {
            Placeholders::new()
                .with("code", &issued.code)
                .with("duration", format_duration(self.ctx.config().link.code_validity()))
                .render(&messages.code_generated)
        }
    }

    /// Check a code typed by `remote_id` and link the accounts on success.
    ///
    /// The code is claimed before anything else, so two messages carrying it
    /// cannot both succeed. Checks run in order and the first failure wins.
    /// Every failure except an unknown code discards the pending code.
    #[instrument(skip(self, remote_name))]
    pub fn verify_code(&self, code: &str, remote_id: Snowflake, remote_name: &str) -> VerifyOutcome {
        let store = self.ctx.link_store();
        let now = self.ctx.clock().now();

        let Some(pending) = store.remove_pending(code) else {
            return VerifyOutcome::NotFound;
        };

        if pending.is_expired_at(now) {
            info!(player = %pending.player_id, "Rejected expired code");
            return VerifyOutcome::Expired;
        }

        let candidate = LinkRecord::new(
            pending.player_id,
            pending.player_name.clone(),
            remote_id,
            remote_name,
            now,
        );
        let allow_overwrite = self.ctx.config().link.auto_overwrite_existing_link;

        let AppliedLink { record, replaced } = match store.try_link(candidate, allow_overwrite) {
            Ok(applied) => applied,
            Err(LinkConflict::RemoteTaken(owner)) => {
                info!(player = %pending.player_id, owner = %owner, "Remote account already linked elsewhere");
                return VerifyOutcome::RemoteAlreadyLinked;
            }
            Err(LinkConflict::PlayerLinked) => {
                info!(player = %pending.player_id, "Player already linked");
                return VerifyOutcome::AlreadyLinked;
            }
        };

        info!(
            player = %record.player_id,
            remote_id = %remote_id,
            replaced = replaced.is_some(),
            "Account linked"
        );

        LinkNotifier::new(self.ctx).notify(&LinkEvent::Linked {
            record: record.clone(),
            replaced: replaced.is_some(),
        });

        if self.ctx.directory().is_online(record.player_id) {
            RoleSynchronizer::spawn(self.ctx.clone(), record.player_id);
            self.confirm_to_player(&record);
        }

        VerifyOutcome::Accepted(record)
    }

    /// Remove a player's link, announcing it when one existed
    ///
    /// # Errors
    /// Never fails on storage; a failed write is logged and the in-memory
    /// removal stands
    #[instrument(skip(self))]
    pub fn unlink(&self, player: PlayerId) -> ServiceResult<Option<LinkRecord>> {
        let store = self.ctx.link_store();
        let existing = store.find_link(player);

        let removed = match store.remove_link(player) {
            Ok(removed) => removed,
            Err(e) => {
                error!(player = %player, error = %e, "Unlink kept in memory only");
                existing
            }
        };

        match &removed {
            Some(record) => {
                info!(player = %player, remote_id = %record.remote_id, "Account unlinked");
                LinkNotifier::new(self.ctx).notify(&LinkEvent::Unlinked {
                    record: record.clone(),
                    at: self.ctx.clock().now(),
                });
            }
            None => warn!(player = %player, "Unlink requested without a link"),
        }

        Ok(removed)
    }

    /// Player-facing text for the result of [`unlink`](Self::unlink)
    pub fn describe_unlink(&self, removed: Option<&LinkRecord>) -> String {
        let messages = &self.ctx.config().link.messages;
        match removed {
            Some(record) => Placeholders::new()
                .with("remote", &record.remote_name)
                .with("player", &record.player_name)
                .render(&messages.unlink_success),
            None => messages.unlink_no_link.clone(),
        }
    }

    pub fn is_linked(&self, player: PlayerId) -> bool {
        self.ctx.link_store().find_link(player).is_some()
    }

    pub fn find_link(&self, player: PlayerId) -> Option<LinkRecord> {
        self.ctx.link_store().find_link(player)
    }

    /// The player's live code, if any
    pub fn pending_for(&self, player: PlayerId) -> Option<PendingLink> {
        let now = self.ctx.clock().now();
        self.ctx
            .link_store()
            .find_pending_by_player(player)
            .filter(|p| p.is_live(now))
    }

    fn confirm_to_player(&self, record: &LinkRecord) {
        let message = Placeholders::new()
            .with("remote", &record.remote_name)
            .with("player", &record.player_name)
            .render(&self.ctx.config().link.messages.link_confirmed);
        if message.trim().is_empty() {
            return;
        }

        let outbox = std::sync::Arc::clone(self.ctx.outbox());
        let player_id = record.player_id;
        self.ctx.main_thread().post(Box::new(move || {
            outbox.push(LocalAction::PlayerMessage { player_id, message });
        }));
    }
}
