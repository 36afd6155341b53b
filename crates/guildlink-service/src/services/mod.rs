//! Business logic services
//!
//! Services borrow a [`ServiceContext`] for the duration of a call, the same
//! way for HTTP handlers and gateway listeners.

pub mod bug_report;
pub mod chat;
pub mod console;
pub mod context;
pub mod error;
pub mod link;
pub mod notify;
pub mod roles;
pub mod verification;

// Re-export all services for convenience
pub use bug_report::BugReportService;
pub use chat::ChatRelay;
pub use console::{ConsoleBridge, ConsoleDecision};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use link::{IssuedCode, LinkService, VerifyOutcome};
pub use notify::LinkNotifier;
pub use roles::{RoleSynchronizer, SkipReason, SyncOutcome};
pub use verification::VerificationHandler;
