//! Integration test utilities for the account-link bridge
//!
//! Spawns the HTTP API on a local port, backed either by a full
//! `BridgeRuntime` or by a context wired to an in-process fake of the
//! remote platform.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
