//! Link listing

use axum::{extract::State, Json};
use guildlink_service::dto::{LinkListResponse, LinkResponse};

use crate::extractors::ApiToken;
use crate::state::AppState;

/// GET /links
pub async fn list_links(_auth: ApiToken, State(state): State<AppState>) -> Json<LinkListResponse> {
    let ctx = state.service_context();
    let store = ctx.link_store();

    let mut links: Vec<LinkResponse> = store.links().iter().map(LinkResponse::from).collect();
    links.sort_by(|a, b| a.player_name.cmp(&b.player_name));

    Json(LinkListResponse {
        total: links.len(),
        links,
        pending: store.pending_len(),
        codes_generated: store.codes_generated(),
    })
}
