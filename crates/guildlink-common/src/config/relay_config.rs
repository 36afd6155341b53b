//! Chat relay, console bridge, and bug report configuration

use serde::Deserialize;

use guildlink_core::Snowflake;

use super::link_config::WebhookSettings;

/// Game chat forwarded to the remote platform through a webhook
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook: WebhookSettings,
    #[serde(default = "default_chat_channel")]
    pub default_channel: String,
    #[serde(default)]
    pub channels: Vec<ChatChannelConfig>,
    #[serde(default = "default_true")]
    pub send_join_leave: bool,
    #[serde(default = "default_join_format")]
    pub join_format: String,
    #[serde(default = "default_leave_format")]
    pub leave_format: String,
}

impl ChatConfig {
    pub fn channel(&self, name: &str) -> Option<&ChatChannelConfig> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Settings for `name`; the default channel works without an explicit entry
    pub fn resolve_channel(&self, name: &str) -> Option<ChatChannelConfig> {
        self.channel(name).cloned().or_else(|| {
            (name == self.default_channel).then(|| ChatChannelConfig {
                name: name.to_string(),
                ..ChatChannelConfig::default()
            })
        })
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook: WebhookSettings::default(),
            default_channel: default_chat_channel(),
            channels: Vec::new(),
            send_join_leave: true,
            join_format: default_join_format(),
            leave_format: default_leave_format(),
        }
    }
}

/// One named chat channel
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChannelConfig {
    #[serde(default = "default_chat_channel")]
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Placeholders: {player}, {displayname}, {message}, {world}, {x}, {y}, {z}
    #[serde(default = "default_message_format")]
    pub message_format: String,
    /// Local group required to be relayed; blank means everyone
    #[serde(default)]
    pub permission: String,
}

impl Default for ChatChannelConfig {
    fn default() -> Self {
        Self {
            name: default_chat_channel(),
            enabled: true,
            message_format: default_message_format(),
            permission: String::new(),
        }
    }
}

/// A remote channel whose messages are run as server console commands
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleChannelConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default = "default_true")]
    pub allow_commands: bool,
    /// Whitelist when `list_is_whitelist`, blacklist otherwise
    #[serde(default = "default_command_list")]
    pub command_list: Vec<String>,
    #[serde(default)]
    pub list_is_whitelist: bool,
    #[serde(default = "default_true")]
    pub block_bots: bool,
    /// Empty means any member may run commands
    #[serde(default)]
    pub allowed_roles: Vec<Snowflake>,
    #[serde(default = "default_true")]
    pub log_commands: bool,
    #[serde(default = "default_console_log")]
    pub log_file_path: String,
}

impl ConsoleChannelConfig {
    pub fn channel(&self) -> Option<Snowflake> {
        Snowflake::parse_optional(&self.channel_id)
    }
}

impl Default for ConsoleChannelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_id: String::new(),
            allow_commands: true,
            command_list: default_command_list(),
            list_is_whitelist: false,
            block_bots: true,
            allowed_roles: Vec::new(),
            log_commands: true,
            log_file_path: default_console_log(),
        }
    }
}

/// Bug reports posted to a webhook (forum channels supported)
#[derive(Debug, Clone, Deserialize)]
pub struct BugReportConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook: WebhookSettings,
    #[serde(default = "default_categories")]
    pub categories: Vec<BugCategory>,
    #[serde(default = "default_status")]
    pub default_status: String,
    #[serde(default = "default_thread_name_template")]
    pub thread_name_template: String,
    #[serde(default)]
    pub default_tag_ids: Vec<Snowflake>,
    #[serde(default)]
    pub ping_role_ids: Vec<Snowflake>,
    #[serde(default)]
    pub content_template: String,
    #[serde(default = "default_title_template")]
    pub title_template: String,
    #[serde(default = "default_description_template")]
    pub description_template: String,
    /// Hex color of the embed sidebar, e.g. `#ff5555`
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<EmbedFieldTemplate>,
}

impl BugReportConfig {
    /// Display name of a category, falling back to its id
    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map_or(id, |c| c.display_name.as_str())
    }
}

impl Default for BugReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook: WebhookSettings::default(),
            categories: default_categories(),
            default_status: default_status(),
            thread_name_template: default_thread_name_template(),
            default_tag_ids: Vec::new(),
            ping_role_ids: Vec::new(),
            content_template: String::new(),
            title_template: default_title_template(),
            description_template: default_description_template(),
            color: default_color(),
            fields: default_fields(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BugCategory {
    pub id: String,
    pub display_name: String,
}

/// Embed field with placeholder support
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedFieldTemplate {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl EmbedFieldTemplate {
    fn new(name: &str, value: &str, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            inline,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_chat_channel() -> String {
    "global".to_string()
}

fn default_message_format() -> String {
    "**{player}**: {message}".to_string()
}

fn default_join_format() -> String {
    "**{player}** joined the server".to_string()
}

fn default_leave_format() -> String {
    "**{player}** left the server".to_string()
}

fn default_command_list() -> Vec<String> {
    ["stop", "restart", "reload"].map(String::from).to_vec()
}

fn default_console_log() -> String {
    "logs/remote-console.log".to_string()
}

fn default_categories() -> Vec<BugCategory> {
    vec![BugCategory {
        id: "general".to_string(),
        display_name: "General".to_string(),
    }]
}

fn default_status() -> String {
    "open".to_string()
}

fn default_thread_name_template() -> String {
    "Bug #{id}: {title}".to_string()
}

fn default_title_template() -> String {
    "{title}".to_string()
}

fn default_description_template() -> String {
    "{message}".to_string()
}

fn default_color() -> String {
    "#ff5555".to_string()
}

fn default_fields() -> Vec<EmbedFieldTemplate> {
    vec![
        EmbedFieldTemplate::new("Player", "{player}", true),
        EmbedFieldTemplate::new("Category", "{category}", true),
        EmbedFieldTemplate::new("Server", "{server}", true),
        EmbedFieldTemplate::new("World", "{world}", true),
        EmbedFieldTemplate::new("Location", "{x}, {y}, {z}", false),
    ]
}
