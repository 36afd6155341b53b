//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use guildlink_core::PlayerId;

use crate::response::ApiError;

/// `{player_id}` path segment parsed as a [`PlayerId`]
#[derive(Debug, Clone, Copy)]
pub struct PlayerPath(pub PlayerId);

#[async_trait]
impl<S> FromRequestParts<S> for PlayerPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        PlayerId::parse(&raw)
            .map(PlayerPath)
            .map_err(|_| ApiError::invalid_path("Invalid player_id format"))
    }
}
