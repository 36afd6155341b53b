//! Bearer token check for calls from the game server
//!
//! When `api.auth_token` is configured every `/api/v1` request must carry
//! `Authorization: Bearer <token>`. Without a configured token the API is
//! open, which is only sensible when it listens on loopback.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::response::ApiError;
use crate::state::AppState;

/// Proof that the request passed the token check
#[derive(Debug, Clone, Copy)]
pub struct ApiToken;

#[async_trait]
impl<S> FromRequestParts<S> for ApiToken
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppState::from_ref(state).config();
        let Some(expected) = config.api.auth_token() else {
            return Ok(ApiToken);
        };

        let provided = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(ApiError::MissingAuth)?
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::InvalidToken)?;

        if provided.trim() == expected.trim() {
            Ok(ApiToken)
        } else {
            tracing::warn!("Rejected request with wrong API token");
            Err(ApiError::InvalidToken)
        }
    }
}
