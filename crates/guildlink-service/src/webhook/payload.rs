//! Webhook JSON payload

use guildlink_core::Snowflake;
use serde::Serialize;

/// Body of a webhook execution request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,

    /// Creates a forum thread with this name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_name: Option<String>,

    /// Forum tag ids applied to the created thread
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied_tags: Vec<Snowflake>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
}

impl WebhookMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Override the sender identity, ignoring blank values
    pub fn with_identity(mut self, username: Option<&str>, avatar_url: Option<&str>) -> Self {
        let non_blank = |s: Option<&str>| s.filter(|v| !v.trim().is_empty()).map(str::to_owned);
        if let Some(username) = non_blank(username) {
            self.username = Some(username);
        }
        if let Some(avatar_url) = non_blank(avatar_url) {
            self.avatar_url = Some(avatar_url);
        }
        self
    }

    /// Mention `roles` at the end of the content and allow exactly those
    /// mentions to ping.
    pub fn with_role_pings(mut self, roles: &[Snowflake]) -> Self {
        if roles.is_empty() {
            return self;
        }
        for role in roles {
            self.content.push(' ');
            self.content.push_str(&role.role_mention());
        }
        self.allowed_mentions = Some(AllowedMentions {
            parse: Vec::new(),
            roles: roles.to_vec(),
        });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// RGB packed into an integer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
    pub roles: Vec<Snowflake>,
}

/// Parse `#rrggbb` (leading `#` optional) into an embed color
pub fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
