//! Domain entities - core business objects

mod bug_report;
mod link;
mod remote;
mod role_mapping;

pub use bug_report::{BugReport, LocationSnapshot};
pub use link::{LinkRecord, PendingLink};
pub use remote::{PartialMember, RemoteMember, RemoteMessage, RemoteRole, RemoteUser};
pub use role_mapping::{compute_role_delta, select_mapping, RoleDelta, RoleMapping};
