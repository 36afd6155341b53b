//! Bug report service
//!
//! Numbers in-game bug reports from a persisted sequence and posts them to a
//! forum webhook.

use guildlink_common::{BugReportConfig, Placeholders};
use guildlink_core::BugReport;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use crate::dto::SubmitBugReportRequest;
use crate::webhook::{parse_hex_color, Embed, WebhookMessage};

pub struct BugReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BugReportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// File a report and announce it
    ///
    /// # Errors
    /// Returns `ServiceError::Disabled` when bug reports are off, and a
    /// validation error for an unknown category
    #[instrument(skip(self, request), fields(player = %request.player_name))]
    pub fn submit(&self, request: SubmitBugReportRequest) -> ServiceResult<BugReport> {
        let config = &self.ctx.config().bug_report;
        if !config.enabled {
            return Err(ServiceError::Disabled("Bug reports"));
        }

        let category_id = match request.category.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => {
                if !config.categories.iter().any(|c| c.id == id) {
                    return Err(ServiceError::validation(format!("Unknown category: {id}")));
                }
                id.to_string()
            }
            _ => config
                .categories
                .first()
                .map_or_else(|| "general".to_string(), |c| c.id.clone()),
        };

        let store = self.ctx.bug_reports();
        let now = self.ctx.clock().now();
        let report = BugReport {
            id: store.next_id(),
            title: request.title,
            message: request.message,
            category_id,
            status_id: config.default_status.clone(),
            player_name: request.player_name,
            player_id: request.player_id,
            world: request.world,
            location: request.location,
            game_mode: request.game_mode,
            server_name: self.ctx.config().app.server_name.clone(),
            created_at: now,
            updated_at: now,
            custom_fields: request.custom_fields,
        };
        store.save(report.clone());

        info!(id = report.id, category = %report.category_id, "Bug report filed");

        if config.webhook.is_active() {
            self.ctx
                .webhook()
                .send(&config.webhook, build_message(config, &report));
        } else {
            warn!(id = report.id, "Bug report webhook inactive, report kept locally");
        }

        Ok(report)
    }

    pub fn find(&self, id: u64) -> ServiceResult<BugReport> {
        self.ctx
            .bug_reports()
            .find(id)
            .ok_or_else(|| ServiceError::not_found("Bug report", id.to_string()))
    }
}

fn placeholders(config: &BugReportConfig, report: &BugReport) -> Placeholders {
    let (x, y, z) = report
        .location
        .map(|l| l.rounded())
        .map_or((String::new(), String::new(), String::new()), |(x, y, z)| {
            (x.to_string(), y.to_string(), z.to_string())
        });

    let mut values = Placeholders::new()
        .with("id", report.id)
        .with("title", &report.title)
        .with("message", &report.message)
        .with("category", config.category_name(&report.category_id))
        .with("status", &report.status_id)
        .with("player", &report.player_name)
        .with("server", &report.server_name)
        .with("world", report.world.as_deref().unwrap_or_default())
        .with("x", x)
        .with("y", y)
        .with("z", z)
        .with("gamemode", report.game_mode.as_deref().unwrap_or_default())
        .with("created_at", report.created_at.format("%Y-%m-%d %H:%M:%S"));
    values.extend(report.custom_fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    values
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

pub(crate) fn build_message(config: &BugReportConfig, report: &BugReport) -> WebhookMessage {
    let values = placeholders(config, report);

    let mut embed = Embed {
        title: non_blank(values.render(&config.title_template)),
        description: non_blank(values.render(&config.description_template)),
        color: parse_hex_color(&config.color),
        fields: Vec::new(),
    };
    for field in &config.fields {
        let value = values.render(&field.value);
        if value.trim().is_empty() {
            continue;
        }
        embed = embed.field(values.render(&field.name), value, field.inline);
    }

    let mut message = WebhookMessage::new(values.render(&config.content_template))
        .with_embed(embed)
        .with_role_pings(&config.ping_role_ids);
    message.thread_name = non_blank(values.render(&config.thread_name_template));
    message.applied_tags = config.default_tag_ids.clone();
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;
    use guildlink_common::AppConfig;
    use guildlink_core::{LocationSnapshot, Snowflake};
    use std::collections::BTreeMap;

    fn request() -> SubmitBugReportRequest {
        SubmitBugReportRequest {
            title: "Door glitch".to_string(),
            message: "Spawn door is stuck".to_string(),
            category: None,
            player_name: "Steve".to_string(),
            player_id: None,
            world: Some("world".to_string()),
            location: Some(LocationSnapshot {
                x: 1.6,
                y: 70.0,
                z: -2.2,
                yaw: 0.0,
                pitch: 0.0,
            }),
            game_mode: Some("SURVIVAL".to_string()),
            custom_fields: BTreeMap::from([("client".to_string(), "1.21".to_string())]),
        }
    }

    fn enabled() -> AppConfig {
        let mut config = AppConfig::default();
        config.bug_report.enabled = true;
        config
    }

    #[tokio::test]
    async fn test_disabled() {
        let h = harness(AppConfig::default(), &[]);
        assert!(matches!(
            BugReportService::new(&h.ctx).submit(request()),
            Err(ServiceError::Disabled(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let h = harness(enabled(), &[]);
        let service = BugReportService::new(&h.ctx);

        let first = service.submit(request()).unwrap();
        let second = service.submit(request()).unwrap();

        assert_eq!(second.id, first.id + 1);
        assert_eq!(first.category_id, "general");
        assert_eq!(first.status_id, "open");
        assert_eq!(service.find(first.id).unwrap().title, "Door glitch");
        assert!(service.find(999).is_err());
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let h = harness(enabled(), &[]);
        let mut bad = request();
        bad.category = Some("graphics".to_string());
        assert!(matches!(
            BugReportService::new(&h.ctx).submit(bad),
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_message_rendering() {
        let mut config = enabled().bug_report;
        config.ping_role_ids = vec![Snowflake::new(55)];
        config.default_tag_ids = vec![Snowflake::new(66)];
        config.content_template = "New report from {player} on {client}".to_string();

        let h = harness(enabled(), &[]);
        let report = BugReportService::new(&h.ctx).submit(request()).unwrap();
        let message = build_message(&config, &report);

        assert_eq!(message.content, "New report from Steve on 1.21 <@&55>");
        assert_eq!(message.thread_name.as_deref(), Some(format!("Bug #{}: Door glitch", report.id).as_str()));
        assert_eq!(message.applied_tags, vec![Snowflake::new(66)]);

        let embed = &message.embeds[0];
        assert_eq!(embed.title.as_deref(), Some("Door glitch"));
        assert_eq!(embed.description.as_deref(), Some("Spawn door is stuck"));
        assert_eq!(embed.color, Some(0xff5555));
        let location = embed.fields.iter().find(|f| f.name == "Location").unwrap();
        assert_eq!(location.value, "2, 70, -2");
        assert!(!location.inline);
        let category = embed.fields.iter().find(|f| f.name == "Category").unwrap();
        assert_eq!(category.value, "General");
    }
}
