//! Bug report entity - a report filed by a player in game

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::PlayerId;

/// Where the reporter stood when filing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl LocationSnapshot {
    /// Block coordinates, rounded the way players read them
    pub fn rounded(&self) -> (i64, i64, i64) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            self.z.round() as i64,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugReport {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub category_id: String,
    pub status_id: String,
    pub player_name: String,
    pub player_id: Option<PlayerId>,
    pub world: Option<String>,
    pub location: Option<LocationSnapshot>,
    pub game_mode: Option<String>,
    pub server_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}
