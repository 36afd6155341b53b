//! Bridge entry point
//!
//! Run with:
//! ```bash
//! cargo run -p guildlink-api -- ./guildlink.toml
//! ```
//!
//! The optional argument names the config file; otherwise `GUILDLINK_CONFIG`
//! or `./guildlink.toml` is used, with `GUILDLINK__*` env overrides.

use std::path::PathBuf;

use guildlink_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Bridge failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(path.as_deref())?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::from(&config.logging)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        bot = config.bot.can_connect(),
        "Configuration loaded"
    );

    guildlink_api::run(config).await?;
    Ok(())
}
