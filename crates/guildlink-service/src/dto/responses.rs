//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use guildlink_core::{LocationSnapshot, PlayerId, Snowflake};
use serde::Serialize;

use crate::local::LocalAction;

// ============================================================================
// Link Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IssuedCodeResponse {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub reused: bool,
    /// Rendered text to show the player
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    pub player_id: PlayerId,
    pub player_name: String,
    pub remote_id: Snowflake,
    pub remote_name: String,
    pub linked_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub roles: Vec<Snowflake>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
    pub total: usize,
    pub pending: usize,
    pub codes_generated: u64,
}

// ============================================================================
// Presence / Relay Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PresenceResponse {
    pub online: bool,
    pub linked: bool,
    /// A role sync was started in the background
    pub sync_scheduled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelayResponse {
    pub relayed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalActionsResponse {
    pub actions: Vec<LocalAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BugReportResponse {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub category: String,
    pub status: String,
    pub player_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<String>,
    pub server_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub remote: String,
    pub storage: String,
}

impl ReadinessResponse {
    /// Ready when the remote session is up, or the bot is switched off
    pub fn evaluate(bot_enabled: bool, remote_ready: bool, persistent: bool) -> Self {
        let remote = match (bot_enabled, remote_ready) {
            (false, _) => "disabled",
            (true, true) => "ready",
            (true, false) => "connecting",
        };
        let ready = !bot_enabled || remote_ready;
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                remote: remote.to_string(),
                storage: if persistent { "file" } else { "memory" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
