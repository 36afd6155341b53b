//! Axum extractors for request handling

mod auth;
mod path;
mod validated;

pub use auth::ApiToken;
pub use path::PlayerPath;
pub use validated::ValidatedJson;
