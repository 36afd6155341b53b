//! # guildlink-core
//!
//! Domain layer containing link records, pending verification codes, role
//! reconciliation, and the ports the rest of the system plugs into.
//! This crate has zero dependencies on infrastructure (HTTP, storage, gateway).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    compute_role_delta, select_mapping, BugReport, LinkRecord, LocationSnapshot, PartialMember,
    PendingLink, RemoteMember, RemoteMessage, RemoteRole, RemoteUser, RoleDelta, RoleMapping,
};
pub use error::{BlobError, DomainError, RemoteError, RemoteResult};
pub use events::LinkEvent;
pub use traits::{
    BlobStore, Clock, CodeGenerator, LocalDirectory, MainTask, MainThread, ManualClock,
    RandomCodeGenerator, RemotePlatform, SystemClock,
};
pub use value_objects::{
    generate_link_code, is_well_formed_code, normalize_code, PlayerId, PlayerIdParseError,
    Snowflake, SnowflakeParseError, CODE_CHARSET,
};
