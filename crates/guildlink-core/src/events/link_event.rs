//! Link lifecycle events, consumed by the notifier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::LinkRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkEvent {
    Linked {
        record: LinkRecord,
        /// True when the link replaced an existing one for the same player
        replaced: bool,
    },
    Unlinked {
        record: LinkRecord,
        at: DateTime<Utc>,
    },
}

impl LinkEvent {
    pub fn record(&self) -> &LinkRecord {
        match self {
            Self::Linked { record, .. } | Self::Unlinked { record, .. } => record,
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Linked { .. } => "LINKED",
            Self::Unlinked { .. } => "UNLINKED",
        }
    }
}
