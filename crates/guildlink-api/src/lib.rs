//! # guildlink-api
//!
//! HTTP surface the game-server plugin talks to, plus the runtime that wires
//! stores, services and the remote client together.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod runtime;
pub mod server;
pub mod state;

pub use runtime::BridgeRuntime;
pub use server::{create_app, run};
pub use state::AppState;
