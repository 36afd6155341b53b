//! Gateway intents

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// Event groups the session subscribes to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        const GUILDS          = 1 << 0;
        /// Privileged
        const GUILD_MEMBERS   = 1 << 1;
        const GUILD_MESSAGES  = 1 << 9;
        /// Privileged; without it message content arrives empty
        const MESSAGE_CONTENT = 1 << 15;

        /// What the bridge needs: verification codes, console commands and
        /// member role updates
        const BRIDGE = Self::GUILDS.bits()
            | Self::GUILD_MEMBERS.bits()
            | Self::GUILD_MESSAGES.bits()
            | Self::MESSAGE_CONTENT.bits();
    }
}

impl Default for Intents {
    fn default() -> Self {
        Self::BRIDGE
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}
