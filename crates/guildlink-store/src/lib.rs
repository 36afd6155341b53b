//! # guildlink-store
//!
//! Persistence layer for link state and bug reports.
//!
//! ## Overview
//!
//! Every store owns exactly one [`BlobStore`] slot holding a serialized
//! snapshot. This crate provides:
//!
//! - Blob backends (atomic file, in-memory)
//! - The snapshot model written to the link blob
//! - [`LinkStore`], the concurrent link and pending-code store
//! - [`BugReportStore`] with its persisted id sequence
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use guildlink_store::{FileBlobStore, LinkStore};
//!
//! let blob = Arc::new(FileBlobStore::new("./data/links.json"));
//! let store = LinkStore::open(blob);
//! assert!(store.find_link(player).is_none());
//! ```
//!
//! [`BlobStore`]: guildlink_core::BlobStore

pub mod blob;
pub mod models;
pub mod repositories;

// Re-export commonly used types
pub use blob::{FileBlobStore, MemoryBlobStore};
pub use models::LinkSnapshot;
pub use repositories::{
    AppliedLink, BugReportStore, LinkConflict, LinkStore, SequenceStore, StoreResult,
};
