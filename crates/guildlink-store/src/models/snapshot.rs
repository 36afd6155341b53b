//! The JSON document written to the link blob

use serde::{Deserialize, Serialize};

use guildlink_core::{LinkRecord, PendingLink};

/// Full link state as persisted after every link mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    #[serde(default)]
    pub codes_generated: u64,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    #[serde(default)]
    pub pending: Vec<PendingLink>,
}

impl LinkSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
