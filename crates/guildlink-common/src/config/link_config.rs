//! Account linking and bot configuration

use chrono::Duration;
use serde::Deserialize;

use guildlink_core::{RoleMapping, Snowflake};

/// How linking behaves
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_code_validity_minutes")]
    pub code_validity_minutes: i64,
    /// Read for compatibility; at most one live code per player is kept
    #[serde(default = "default_max_pending")]
    pub max_pending_codes_per_player: u32,
    /// Let a verified code replace an existing link for the same player
    #[serde(default)]
    pub auto_overwrite_existing_link: bool,
    /// Channel the bot watches for codes; blank disables verification
    #[serde(default)]
    pub verification_channel_id: String,
    /// First matching group wins, in declaration order
    #[serde(default)]
    pub role_mappings: Vec<RoleMapping>,
    #[serde(default)]
    pub messages: LinkMessages,
    /// Where link and unlink notifications are posted
    #[serde(default)]
    pub webhook: WebhookSettings,
}

impl LinkConfig {
    /// Code validity, never shorter than one minute
    pub fn code_validity(&self) -> Duration {
        Duration::minutes(self.code_validity_minutes.max(1))
    }

    pub fn verification_channel(&self) -> Option<Snowflake> {
        Snowflake::parse_optional(&self.verification_channel_id)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            code_validity_minutes: default_code_validity_minutes(),
            max_pending_codes_per_player: default_max_pending(),
            auto_overwrite_existing_link: false,
            verification_channel_id: String::new(),
            role_mappings: Vec::new(),
            messages: LinkMessages::default(),
            webhook: WebhookSettings::default(),
        }
    }
}

/// Player-facing messages (placeholders: {code}, {duration}, {remote}, {player})
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkMessages {
    pub already_linked: String,
    pub link_instructions: String,
    pub code_generated: String,
    pub link_confirmed: String,
    pub link_revoked: String,
    pub no_link_found: String,
    pub pending_exists: String,
    pub unlink_success: String,
    pub unlink_no_link: String,
}

impl Default for LinkMessages {
    fn default() -> Self {
        Self {
            already_linked: "Your account is already linked to {remote}.".to_string(),
            link_instructions: "Post the code **{code}** in the verification channel within {duration} to complete the link.".to_string(),
            code_generated: "A new verification code has been generated: {code} (expires in {duration}).".to_string(),
            link_confirmed: "Remote account {remote} is now linked to {player}.".to_string(),
            link_revoked: "The link with {remote} has been revoked.".to_string(),
            no_link_found: "No remote account is linked to this player.".to_string(),
            pending_exists: "You already have a pending code: {code} (expires in {duration}).".to_string(),
            unlink_success: "Your account has been unlinked successfully.".to_string(),
            unlink_no_link: "You don't have an account linked.".to_string(),
        }
    }
}

/// Webhook destination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
    /// Overrides the webhook's display name
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl WebhookSettings {
    /// Enabled with a non-blank URL
    pub fn is_active(&self) -> bool {
        self.enabled && !self.url.trim().is_empty()
    }
}

/// Remote platform bot session
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Required for code verification and role sync
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub guild_id: String,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// How long `connect` waits for the session to become ready
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    #[serde(default)]
    pub messages: BotMessages,
}

impl BotConfig {
    pub fn guild(&self) -> Option<Snowflake> {
        Snowflake::parse_optional(&self.guild_id)
    }

    /// Enabled with a usable token
    pub fn can_connect(&self) -> bool {
        self.enabled && !self.token.trim().is_empty()
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            guild_id: String::new(),
            gateway_url: default_gateway_url(),
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            ready_timeout_secs: default_ready_timeout_secs(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            messages: BotMessages::default(),
        }
    }
}

/// Replies posted in the verification channel (placeholders: {player}, {code}).
/// Blank disables the reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotMessages {
    pub success: String,
    pub failure: String,
    pub reply_delete_after_secs: u64,
}

impl Default for BotMessages {
    fn default() -> Self {
        Self {
            success: "Code accepted for {player}.".to_string(),
            failure: "Invalid code for {player}.".to_string(),
            reply_delete_after_secs: 5,
        }
    }
}

fn default_code_length() -> usize {
    6
}

fn default_code_validity_minutes() -> i64 {
    10
}

fn default_max_pending() -> u32 {
    1
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_ready_timeout_secs() -> u64 {
    30
}

fn default_reconnect_delay_ms() -> u64 {
    5000
}
