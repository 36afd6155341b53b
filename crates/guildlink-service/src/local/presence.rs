//! Who is online on the game server, and which groups they hold

use dashmap::DashMap;
use guildlink_core::{LocalDirectory, PlayerId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlinePlayer {
    pub name: String,
    /// Permission groups, lowercased
    pub groups: Vec<String>,
}

/// Presence as last reported by the game server.
///
/// Group names compare case-insensitively.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    online: DashMap<PlayerId, OnlinePlayer>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, player: PlayerId, name: impl Into<String>, groups: Vec<String>) {
        self.online.insert(
            player,
            OnlinePlayer {
                name: name.into(),
                groups: normalize_groups(groups),
            },
        );
    }

    /// Returns the departed player, if they were online
    pub fn quit(&self, player: PlayerId) -> Option<OnlinePlayer> {
        self.online.remove(&player).map(|(_, p)| p)
    }

    /// Replace a player's groups. `false` when the player is not online.
    pub fn set_groups(&self, player: PlayerId, groups: Vec<String>) -> bool {
        match self.online.get_mut(&player) {
            Some(mut entry) => {
                entry.groups = normalize_groups(groups);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, player: PlayerId) -> Option<OnlinePlayer> {
        self.online.get(&player).map(|p| p.clone())
    }

    pub fn online_count(&self) -> usize {
        self.online.len()
    }
}

impl LocalDirectory for PresenceRegistry {
    fn is_online(&self, player: PlayerId) -> bool {
        self.online.contains_key(&player)
    }

    fn has_group(&self, player: PlayerId, group: &str) -> bool {
        let group = group.to_lowercase();
        self.online
            .get(&player)
            .is_some_and(|p| p.groups.iter().any(|g| *g == group))
    }
}

fn normalize_groups(groups: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(groups.len());
    for group in groups {
        let group = group.trim().to_lowercase();
        if !group.is_empty() && !out.contains(&group) {
            out.push(group);
        }
    }
    out
}
