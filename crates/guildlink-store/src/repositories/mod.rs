//! Stores backed by a single blob each

mod bug_report;
mod link_store;
mod sequence;

pub use bug_report::BugReportStore;
pub use link_store::{AppliedLink, LinkConflict, LinkStore};
pub use sequence::SequenceStore;

use guildlink_core::DomainError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;
