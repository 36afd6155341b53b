//! Route definitions
//!
//! Game-server endpoints are mounted under /api/v1; health probes sit at the root.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{health, links, local, players, relay};
use crate::state::AppState;

/// Create the main API router
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes()).merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(player_routes())
        .merge(relay_routes())
        .route("/local/actions", get(local::drain_actions))
        .route("/links", get(links::list_links))
}

fn player_routes() -> Router<AppState> {
    Router::new()
        .route("/players/:player_id/link-code", post(players::issue_link_code))
        .route(
            "/players/:player_id/link",
            get(players::get_link).delete(players::delete_link),
        )
        .route("/players/:player_id/join", post(players::player_join))
        .route("/players/:player_id/quit", post(players::player_quit))
        .route("/players/:player_id/groups", put(players::update_groups))
        .route("/players/:player_id/sync-roles", post(players::sync_roles))
}

fn relay_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(relay::relay_chat))
        .route("/bug-reports", post(relay::submit_bug_report))
        .route("/bug-reports/:report_id", get(relay::get_bug_report))
}
