//! Link entities - confirmed links and pending verification codes

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{normalize_code, PlayerId, Snowflake};

/// A confirmed association between a player and a remote account.
///
/// At most one record exists per player; the link service also keeps each
/// remote id bound to a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub player_id: PlayerId,
    pub player_name: String,
    pub remote_id: Snowflake,
    pub remote_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub linked_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
    /// Remote role ids as of the last role sync
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

impl LinkRecord {
    pub fn new(
        player_id: PlayerId,
        player_name: impl Into<String>,
        remote_id: Snowflake,
        remote_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
            remote_id,
            remote_name: remote_name.into(),
            linked_at: now,
            last_updated: now,
            roles: Vec::new(),
        }
    }

    /// Carry roles over from a previous record for the same player
    pub fn with_roles(mut self, roles: Vec<Snowflake>) -> Self {
        self.roles = roles;
        self
    }

    /// Replace the role snapshot after a sync
    pub fn update_roles(&mut self, roles: Vec<Snowflake>, now: DateTime<Utc>) {
        self.roles = roles;
        self.last_updated = now;
    }
}

/// A verification code waiting to be typed into the verification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLink {
    pub code: String,
    pub player_id: PlayerId,
    pub player_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl PendingLink {
    /// Create a pending code valid for `validity` from `now`.
    ///
    /// `validity` is clamped to at least one millisecond so that
    /// `expires_at > created_at` always holds.
    pub fn new(
        code: impl Into<String>,
        player_id: PlayerId,
        player_name: impl Into<String>,
        now: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        let validity = validity.max(Duration::milliseconds(1));
        Self {
            code: code.into(),
            player_id,
            player_name: player_name.into(),
            created_at: now,
            expires_at: now + validity,
        }
    }

    /// Case-insensitive lookup key
    pub fn key(&self) -> String {
        normalize_code(&self.code)
    }

    /// Live codes may be handed out again instead of minting a new one
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Verification rejects a code only once `now` is strictly past expiry
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}
