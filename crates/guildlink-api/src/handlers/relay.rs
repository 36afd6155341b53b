//! Chat relay and bug report handlers

use axum::{
    extract::{Path, State},
    Json,
};
use guildlink_service::dto::{BugReportResponse, RelayChatRequest, RelayResponse, SubmitBugReportRequest};
use guildlink_service::{BugReportService, ChatRelay};

use crate::extractors::{ApiToken, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// POST /chat
pub async fn relay_chat(
    _auth: ApiToken,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RelayChatRequest>,
) -> ApiResult<Json<RelayResponse>> {
    let ctx = state.service_context();
    let relayed = ChatRelay::new(&ctx).relay_chat(&request)?;
    Ok(Json(RelayResponse { relayed }))
}

/// POST /bug-reports
pub async fn submit_bug_report(
    _auth: ApiToken,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SubmitBugReportRequest>,
) -> ApiResult<Created<Json<BugReportResponse>>> {
    let ctx = state.service_context();
    let report = BugReportService::new(&ctx).submit(request)?;
    Ok(Created(Json(report.into())))
}

/// GET /bug-reports/:report_id
pub async fn get_bug_report(
    _auth: ApiToken,
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> ApiResult<Json<BugReportResponse>> {
    let id: u64 = report_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid report_id format"))?;

    let ctx = state.service_context();
    let report = BugReportService::new(&ctx).find(id)?;
    Ok(Json(report.into()))
}
