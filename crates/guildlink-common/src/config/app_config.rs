//! Application configuration structs
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `GUILDLINK__SECTION__KEY` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::link_config::{BotConfig, LinkConfig};
use super::relay_config::{BugReportConfig, ChatConfig, ConsoleChannelConfig};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "GUILDLINK_CONFIG";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub console: Vec<ConsoleChannelConfig>,
    #[serde(default)]
    pub bug_report: BugReportConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
    /// Name of the game server, shown in notifications
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
            server_name: default_server_name(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Sidecar HTTP API the game server talks to
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret the game-server plugin sends as a bearer token
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured token, ignoring blank values
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Where the persistence blobs live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Keep everything in memory; nothing survives a restart
    #[serde(default)]
    pub in_memory: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_links_file")]
    pub links_file: String,
    #[serde(default = "default_bug_sequence_file")]
    pub bug_sequence_file: String,
}

impl StorageConfig {
    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join(&self.links_file)
    }

    pub fn bug_sequence_path(&self) -> PathBuf {
        self.data_dir.join(&self.bug_sequence_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            in_memory: false,
            data_dir: default_data_dir(),
            links_file: default_links_file(),
            bug_sequence_file: default_bug_sequence_file(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "guildlink".to_string()
}

fn default_server_name() -> String {
    "Minecraft".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8095
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_links_file() -> String {
    "links.json".to_string()
}

fn default_bug_sequence_file() -> String {
    "bug-report-sequence.txt".to_string()
}

impl AppConfig {
    /// Load configuration.
    ///
    /// The file is `path` if given, else `$GUILDLINK_CONFIG`, else an optional
    /// `guildlink.toml` in the working directory. Environment variables
    /// (`GUILDLINK__BOT__TOKEN` and so on) override file values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));

        let file = match explicit {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("guildlink").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("GUILDLINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (no env overlay)
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.code_length == 0 || self.link.code_length > 32 {
            return Err(ConfigError::InvalidValue(
                "link.code_length",
                format!("{} (expected 1..=32)", self.link.code_length),
            ));
        }
        if self.api.port == 0 {
            return Err(ConfigError::InvalidValue("api.port", "0".to_string()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
