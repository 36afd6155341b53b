//! Local outbox handler

use axum::{extract::State, Json};
use guildlink_service::dto::LocalActionsResponse;

use crate::extractors::ApiToken;
use crate::state::AppState;

/// Hand queued console commands and player messages to the game server.
/// Each action is returned exactly once.
///
/// GET /local/actions
pub async fn drain_actions(_auth: ApiToken, State(state): State<AppState>) -> Json<LocalActionsResponse> {
    let actions = state.service_context().outbox().drain();
    Json(LocalActionsResponse { actions })
}
