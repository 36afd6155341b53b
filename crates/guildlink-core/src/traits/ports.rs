//! Ports (traits) - define the interface for storage, the remote platform,
//! and the local game server.
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{RemoteMember, RemoteMessage, RemoteRole, RoleDelta};
use crate::error::{BlobError, RemoteResult};
use crate::value_objects::{PlayerId, Snowflake};

// ============================================================================
// Persistence
// ============================================================================

/// A single opaque string slot owned by one store.
///
/// Implementations must make `write` all-or-nothing: a reader never observes
/// a partially written blob.
pub trait BlobStore: Send + Sync {
    /// Current contents, or `None` when nothing has been written yet
    fn read(&self) -> Result<Option<String>, BlobError>;

    /// Replace the contents
    fn write(&self, contents: &str) -> Result<(), BlobError>;
}

// ============================================================================
// Remote Platform
// ============================================================================

#[async_trait]
pub trait RemotePlatform: Send + Sync {
    /// Whether a session is established and identified
    fn is_ready(&self) -> bool;

    /// Guild all member and role operations target
    fn guild_id(&self) -> Option<Snowflake>;

    /// Our own bot user, known once the session is ready
    fn self_user_id(&self) -> Option<Snowflake>;

    /// Resolve a guild member
    async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> RemoteResult<RemoteMember>;

    /// All roles defined in a guild
    async fn guild_roles(&self, guild_id: Snowflake) -> RemoteResult<Vec<RemoteRole>>;

    /// Apply a role delta to a member in one request, returning the member's
    /// resulting role list
    async fn modify_member_roles(
        &self,
        guild_id: Snowflake,
        member: &RemoteMember,
        delta: &RoleDelta,
    ) -> RemoteResult<Vec<Snowflake>>;

    /// Post a plain text message
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RemoteResult<RemoteMessage>;

    /// React to a message with a unicode emoji
    async fn add_reaction(&self, channel_id: Snowflake, message_id: Snowflake, emoji: &str) -> RemoteResult<()>;

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> RemoteResult<()>;
}

// ============================================================================
// Local Game Server
// ============================================================================

/// What the core may ask about players on the game server
pub trait LocalDirectory: Send + Sync {
    fn is_online(&self, player: PlayerId) -> bool;

    /// Whether the player currently holds a local permission group
    fn has_group(&self, player: PlayerId, group: &str) -> bool;
}

/// Unit of work to run on the game server's primary loop
pub type MainTask = Box<dyn FnOnce() + Send + 'static>;

/// Hands work to the single designated primary loop
pub trait MainThread: Send + Sync {
    /// Queue `task`; tasks run one at a time in the order they were posted
    fn post(&self, task: MainTask);
}
