//! Configuration structs

mod app_config;
mod link_config;
mod relay_config;

pub use app_config::{
    ApiConfig, AppConfig, AppSettings, ConfigError, Environment, LoggingConfig, StorageConfig,
};
pub use link_config::{BotConfig, BotMessages, LinkConfig, LinkMessages, WebhookSettings};
pub use relay_config::{
    BugCategory, BugReportConfig, ChatChannelConfig, ChatConfig, ConsoleChannelConfig,
    EmbedFieldTemplate,
};
