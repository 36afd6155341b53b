//! Player handlers: link codes, link records, presence and role sync

use axum::{extract::State, Json};
use guildlink_core::PlayerId;
use guildlink_service::dto::{
    IssueCodeRequest, IssuedCodeResponse, LinkResponse, PlayerJoinRequest, PresenceResponse,
    UpdateGroupsRequest,
};
use guildlink_service::{ChatRelay, LinkService, RoleSynchronizer, ServiceContext, ServiceError, SyncOutcome};
use tracing::{debug, instrument};

use crate::extractors::{ApiToken, PlayerPath, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Issue (or re-show) a verification code
///
/// POST /players/:player_id/link-code
#[instrument(skip(state, request))]
pub async fn issue_link_code(
    _auth: ApiToken,
    State(state): State<AppState>,
    PlayerPath(player): PlayerPath,
    ValidatedJson(request): ValidatedJson<IssueCodeRequest>,
) -> ApiResult<Json<IssuedCodeResponse>> {
    let ctx = state.service_context();
    let service = LinkService::new(&ctx);

    let issued = service.issue_code(player, &request.player_name);
    let message = service.describe_code(&issued);

    Ok(Json(IssuedCodeResponse {
        code: issued.code,
        expires_at: issued.expires_at,
        reused: issued.reused,
        message,
    }))
}

/// GET /players/:player_id/link
pub async fn get_link(
    _auth: ApiToken,
    State(state): State<AppState>,
    PlayerPath(player): PlayerPath,
) -> ApiResult<Json<LinkResponse>> {
    let ctx = state.service_context();
    let record = LinkService::new(&ctx)
        .find_link(player)
        .ok_or_else(|| ServiceError::not_found("Link", player.to_string()))?;

    Ok(Json(record.into()))
}

/// DELETE /players/:player_id/link
#[instrument(skip(state))]
pub async fn delete_link(
    _auth: ApiToken,
    State(state): State<AppState>,
    PlayerPath(player): PlayerPath,
) -> ApiResult<NoContent> {
    let ctx = state.service_context();
    // The unlink rewrites the snapshot file; keep it off the runtime workers
    tokio::task::spawn_blocking(move || LinkService::new(&ctx).unlink(player))
        .await
        .map_err(|e| ServiceError::internal(e.to_string()))??
        .ok_or_else(|| ServiceError::not_found("Link", player.to_string()))?;

    Ok(NoContent)
}

/// Mark a player online, sync their roles and announce the join
///
/// POST /players/:player_id/join
#[instrument(skip(state, request), fields(player_name = %request.player_name))]
pub async fn player_join(
    _auth: ApiToken,
    State(state): State<AppState>,
    PlayerPath(player): PlayerPath,
    ValidatedJson(request): ValidatedJson<PlayerJoinRequest>,
) -> ApiResult<Json<PresenceResponse>> {
    let ctx = state.service_context();
    state.presence().join(player, request.player_name.clone(), request.groups);

    let (linked, sync_scheduled) = schedule_sync(&ctx, player);
    ChatRelay::new(&ctx).relay_join(player, &request.player_name);

    Ok(Json(PresenceResponse {
        online: true,
        linked,
        sync_scheduled,
    }))
}

/// POST /players/:player_id/quit
#[instrument(skip(state))]
pub async fn player_quit(
    _auth: ApiToken,
    State(state): State<AppState>,
    PlayerPath(player): PlayerPath,
) -> ApiResult<Json<PresenceResponse>> {
    let ctx = state.service_context();

    match state.presence().quit(player) {
        Some(online) => {
            ChatRelay::new(&ctx).relay_leave(player, &online.name);
        }
        None => debug!("Quit for a player that was not online"),
    }

    Ok(Json(PresenceResponse {
        online: false,
        linked: ctx.link_store().find_link(player).is_some(),
        sync_scheduled: false,
    }))
}

/// Replace an online player's groups and resync
///
/// PUT /players/:player_id/groups
#[instrument(skip(state, request))]
pub async fn update_groups(
    _auth: ApiToken,
    State(state): State<AppState>,
    PlayerPath(player): PlayerPath,
    ValidatedJson(request): ValidatedJson<UpdateGroupsRequest>,
) -> ApiResult<Json<PresenceResponse>> {
    if !state.presence().set_groups(player, request.groups) {
        return Err(ServiceError::not_found("Online player", player.to_string()).into());
    }

    let ctx = state.service_context();
    let (linked, sync_scheduled) = schedule_sync(&ctx, player);

    Ok(Json(PresenceResponse {
        online: true,
        linked,
        sync_scheduled,
    }))
}

/// Run a role sync now and report the outcome
///
/// POST /players/:player_id/sync-roles
pub async fn sync_roles(
    _auth: ApiToken,
    State(state): State<AppState>,
    PlayerPath(player): PlayerPath,
) -> ApiResult<Json<SyncOutcome>> {
    let ctx = state.service_context();
    let outcome = RoleSynchronizer::new(&ctx).sync_roles(player).await;
    Ok(Json(outcome))
}

/// Start a background sync for linked players; returns (linked, scheduled)
fn schedule_sync(ctx: &ServiceContext, player: PlayerId) -> (bool, bool) {
    if ctx.link_store().find_link(player).is_none() {
        return (false, false);
    }
    RoleSynchronizer::spawn(ctx.clone(), player);
    (true, true)
}
