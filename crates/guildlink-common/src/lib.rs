//! # guildlink-common
//!
//! Shared utilities including configuration, error handling, telemetry, and
//! placeholder templates.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod text;

// Re-export commonly used types at crate root
pub use config::{
    ApiConfig, AppConfig, AppSettings, BotConfig, BotMessages, BugCategory, BugReportConfig,
    ChatChannelConfig, ChatConfig, ConfigError, ConsoleChannelConfig, EmbedFieldTemplate,
    Environment, LinkConfig, LinkMessages, LoggingConfig, StorageConfig, WebhookSettings,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
pub use text::{format_duration, Placeholders};
