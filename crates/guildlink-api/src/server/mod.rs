//! Server setup and initialization

use std::time::Duration;

use axum::Router;
use guildlink_common::{AppConfig, AppError};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::runtime::BridgeRuntime;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config().api.request_timeout_secs.max(1));
    apply_middleware(create_router(), timeout).with_state(state)
}

/// Serve `app` until ctrl-c
pub async fn run_server(app: Router, address: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::internal)?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Start the runtime, serve the API, then shut the runtime down
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();

    let runtime = BridgeRuntime::start(config).await?;
    let app = create_app(runtime.state());

    let served = run_server(app, &address).await;
    runtime.shutdown().await;
    served
}
