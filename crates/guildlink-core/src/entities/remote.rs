//! Views of remote platform objects
//!
//! These mirror the JSON the platform sends over its gateway and REST API,
//! trimmed to the fields this system reads.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A remote user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl RemoteUser {
    /// Display tag: `name#1234` for legacy accounts, the bare username otherwise
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }

    /// Name shown in the guild when no nickname is set
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// A user's membership in a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMember {
    pub user: RemoteUser,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(default)]
    pub nick: Option<String>,
}

impl RemoteMember {
    pub fn has_role(&self, role: Snowflake) -> bool {
        self.roles.contains(&role)
    }
}

/// Member data attached to a guild message (no nested user)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMember {
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(default)]
    pub nick: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRole {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

/// A message posted in a guild channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: RemoteUser,
    #[serde(default)]
    pub member: Option<PartialMember>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub webhook_id: Option<Snowflake>,
}

impl RemoteMessage {
    /// Messages posted by bots or webhooks never count as user input
    pub fn is_automated(&self) -> bool {
        self.author.bot || self.webhook_id.is_some()
    }

    /// Author's roles, when the platform attached member data
    pub fn author_roles(&self) -> &[Snowflake] {
        self.member.as_ref().map_or(&[], |m| m.roles.as_slice())
    }
}
