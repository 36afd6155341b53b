//! Role synchronizer
//!
//! Mirrors a player's local permission group onto the mapped remote role.

use guildlink_core::{compute_role_delta, select_mapping, PlayerId, RoleDelta, Snowflake};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotLinked,
    RemoteUnavailable,
}

/// What a sync did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    Skipped { reason: SkipReason },
    Failed { reason: String },
    /// One membership update was sent; `roles` is the member's resulting list
    Applied { delta: RoleDelta, roles: Vec<Snowflake> },
    Unchanged,
}

/// Role synchronizer
pub struct RoleSynchronizer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleSynchronizer<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run a sync in the background
    pub fn spawn(ctx: ServiceContext, player: PlayerId) -> JoinHandle<SyncOutcome> {
        tokio::spawn(async move { RoleSynchronizer::new(&ctx).sync_roles(player).await })
    }

    /// Reconcile the linked member's mapped roles with the player's groups.
    ///
    /// Only roles named by a mapping and present in the guild are touched.
    /// Failures are logged and not retried.
    #[instrument(skip(self))]
    pub async fn sync_roles(&self, player: PlayerId) -> SyncOutcome {
        let Some(link) = self.ctx.link_store().find_link(player) else {
            return SyncOutcome::Skipped {
                reason: SkipReason::NotLinked,
            };
        };

        let remote = self.ctx.remote();
        let guild_id = match remote.guild_id() {
            Some(guild_id) if remote.is_ready() => guild_id,
            _ => {
                warn!(player = %player, "Remote client not ready, skipping role sync");
                return SyncOutcome::Skipped {
                    reason: SkipReason::RemoteUnavailable,
                };
            }
        };

        let member = match remote.fetch_member(guild_id, link.remote_id).await {
            Ok(member) => member,
            Err(e) => {
                warn!(player = %player, remote_id = %link.remote_id, error = %e, "Could not resolve guild member");
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let guild_roles = match remote.guild_roles(guild_id).await {
            Ok(roles) => roles,
            Err(e) => {
                warn!(error = %e, "Could not list guild roles");
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let mappings = &self.ctx.config().link.role_mappings;
        let directory = self.ctx.directory();
        let target = select_mapping(mappings, |group| directory.has_group(player, group))
            .map(|m| m.remote_role_id);

        let mut universe: Vec<Snowflake> = Vec::new();
        for mapping in mappings {
            let id = mapping.remote_role_id;
            if guild_roles.iter().any(|r| r.id == id) && !universe.contains(&id) {
                universe.push(id);
            }
        }

        let delta = compute_role_delta(&member.roles, &universe, target);
        if delta.is_empty() {
            if link.roles != member.roles {
                self.write_back(player, member.roles);
            }
            return SyncOutcome::Unchanged;
        }

        let roles = match remote.modify_member_roles(guild_id, &member, &delta).await {
            Ok(roles) => roles,
            Err(e) => {
                warn!(player = %player, error = %e, "Role update rejected");
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        info!(
            player = %player,
            added = delta.add.len(),
            removed = delta.remove.len(),
            "Roles synchronized"
        );

        self.write_back(player, roles.clone());
        SyncOutcome::Applied { delta, roles }
    }

    fn write_back(&self, player: PlayerId, roles: Vec<Snowflake>) {
        let now = self.ctx.clock().now();
        if let Err(e) = self.ctx.link_store().set_roles(player, roles, now) {
            warn!(player = %player, error = %e, "Role snapshot kept in memory only");
        }
    }
}
