//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use std::collections::BTreeMap;

use guildlink_core::{LocationSnapshot, PlayerId};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Link Requests
// ============================================================================

/// Ask for a verification code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueCodeRequest {
    #[validate(length(min = 1, max = 32, message = "Player name must be 1-32 characters"))]
    pub player_name: String,
}

// ============================================================================
// Presence Requests
// ============================================================================

/// A player joined the game server
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlayerJoinRequest {
    #[validate(length(min = 1, max = 32, message = "Player name must be 1-32 characters"))]
    pub player_name: String,

    /// Local permission groups the player holds
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Replace a player's permission groups
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGroupsRequest {
    #[validate(length(max = 64, message = "At most 64 groups"))]
    pub groups: Vec<String>,
}

// ============================================================================
// Relay Requests
// ============================================================================

/// One chat line from the game server
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RelayChatRequest {
    pub player_id: PlayerId,

    #[validate(length(min = 1, max = 32, message = "Player name must be 1-32 characters"))]
    pub player_name: String,

    /// Name with prefixes and formatting stripped; defaults to the player name
    pub display_name: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,

    /// Target chat channel; the configured default when absent
    pub channel: Option<String>,

    pub world: Option<String>,

    pub location: Option<LocationSnapshot>,
}

/// Bug report filed in game
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitBugReportRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub message: String,

    /// Category id; the first configured category when absent
    pub category: Option<String>,

    #[validate(length(min = 1, max = 32, message = "Player name must be 1-32 characters"))]
    pub player_name: String,

    pub player_id: Option<PlayerId>,

    pub world: Option<String>,

    pub location: Option<LocationSnapshot>,

    pub game_mode: Option<String>,

    /// Extra values, also usable as template placeholders
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}
