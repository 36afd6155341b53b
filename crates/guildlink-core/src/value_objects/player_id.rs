//! Player identifier - stable id of a player on the game server

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable game-server player id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    #[inline]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Random id, used for fixtures and offline players without a profile
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn parse(s: &str) -> Result<Self, PlayerIdParseError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| PlayerIdParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid player id: {0}")]
pub struct PlayerIdParseError(String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = PlayerIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id = PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap();
        assert_eq!(id.to_string(), "069a79f4-44e9-4726-a5be-fca90e38aaf5");
    }

    #[test]
    fn test_parse_accepts_simple_form() {
        let a = PlayerId::parse("069a79f444e94726a5befca90e38aaf5").unwrap();
        let b = PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = PlayerId::parse("Notch").unwrap_err();
        assert_eq!(err.to_string(), "invalid player id: Notch");
    }

    #[test]
    fn test_serde_transparent() {
        let id = PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"069a79f4-44e9-4726-a5be-fca90e38aaf5\"");
    }
}
