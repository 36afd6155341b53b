//! Entity to DTO mappers

use guildlink_core::{BugReport, LinkRecord};

use super::responses::{BugReportResponse, LinkResponse};

impl From<&LinkRecord> for LinkResponse {
    fn from(record: &LinkRecord) -> Self {
        Self {
            player_id: record.player_id,
            player_name: record.player_name.clone(),
            remote_id: record.remote_id,
            remote_name: record.remote_name.clone(),
            linked_at: record.linked_at,
            last_updated: record.last_updated,
            roles: record.roles.clone(),
        }
    }
}

impl From<LinkRecord> for LinkResponse {
    fn from(record: LinkRecord) -> Self {
        Self::from(&record)
    }
}

impl From<BugReport> for BugReportResponse {
    fn from(report: BugReport) -> Self {
        Self {
            id: report.id,
            title: report.title,
            message: report.message,
            category: report.category_id,
            status: report.status_id,
            player_name: report.player_name,
            player_id: report.player_id,
            world: report.world,
            location: report.location,
            game_mode: report.game_mode,
            server_name: report.server_name,
            created_at: report.created_at,
            custom_fields: report.custom_fields,
        }
    }
}
