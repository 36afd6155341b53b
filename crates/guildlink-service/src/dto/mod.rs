//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for calls from the game server
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    IssueCodeRequest, PlayerJoinRequest, RelayChatRequest, SubmitBugReportRequest,
    UpdateGroupsRequest,
};

pub use responses::{
    BugReportResponse, HealthChecks, HealthResponse, IssuedCodeResponse, LinkListResponse,
    LinkResponse, LocalActionsResponse, PresenceResponse, ReadinessResponse, RelayResponse,
};
