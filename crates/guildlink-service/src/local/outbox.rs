//! Work queued for the game server

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use guildlink_core::PlayerId;
use parking_lot::Mutex;
use serde::Serialize;

/// Something the game server must do on its side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalAction {
    /// Run a console command. `source` names who issued it remotely.
    ConsoleCommand {
        command: String,
        source: String,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        queued_at: DateTime<Utc>,
    },

    /// Show a message to one player if they are still online
    PlayerMessage { player_id: PlayerId, message: String },
}

/// FIFO drained by `GET /local/actions`
#[derive(Debug, Default)]
pub struct LocalOutbox {
    queue: Mutex<VecDeque<LocalAction>>,
}

impl LocalOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, action: LocalAction) {
        self.queue.lock().push_back(action);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<LocalAction> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_is_fifo_and_empties() {
        let outbox = LocalOutbox::new();
        let player = PlayerId::random();
        outbox.push(LocalAction::PlayerMessage {
            player_id: player,
            message: "first".to_string(),
        });
        outbox.push(LocalAction::PlayerMessage {
            player_id: player,
            message: "second".to_string(),
        });

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(&drained[0], LocalAction::PlayerMessage { message, .. } if message == "first"));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_action_json() {
        let action = LocalAction::ConsoleCommand {
            command: "stop".to_string(),
            source: "alice".to_string(),
            queued_at: DateTime::from_timestamp_millis(1_000).unwrap(),
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "CONSOLE_COMMAND");
        assert_eq!(value["command"], "stop");
        assert_eq!(value["queued_at"], 1000);
    }
}
