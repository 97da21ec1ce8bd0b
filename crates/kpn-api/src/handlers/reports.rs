//! Report handlers
//!
//! Filing, review and escalation along the tier paths.

use axum::{extract::State, Json};
use kpn_service::dto::{CreateReportRequest, EscalationResponse, ReportResponse, ReviewReportRequest, ReviewResponse};
use kpn_service::ReportService;

use crate::extractors::{AuthMember, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// File and address a report in one step
///
/// POST /reports
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<CreateReportRequest>,
) -> ApiResult<Created<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    Ok(Created(service.submit(auth.member_id, request).await?))
}

/// POST /reports/drafts
pub async fn create_draft(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<CreateReportRequest>,
) -> ApiResult<Created<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    Ok(Created(service.create_draft(auth.member_id, request).await?))
}

/// POST /reports/{id}/submit
pub async fn submit_draft(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(report_id): IdPath,
) -> ApiResult<Json<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    Ok(Json(service.submit_draft(auth.member_id, report_id).await?))
}

/// POST /reports/{id}/review
pub async fn review(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(report_id): IdPath,
    ValidatedJson(request): ValidatedJson<ReviewReportRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    let service = ReportService::new(state.service_context());
    Ok(Json(service.review(auth.member_id, report_id, request).await?))
}

/// POST /reports/{id}/escalate
pub async fn escalate(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(report_id): IdPath,
) -> ApiResult<Json<EscalationResponse>> {
    let service = ReportService::new(state.service_context());
    Ok(Json(service.escalate(auth.member_id, report_id).await?))
}

/// GET /reports/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(report_id): IdPath,
) -> ApiResult<Json<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    Ok(Json(service.get(report_id).await?))
}

/// The whole escalation chain a report belongs to, origin first
///
/// GET /reports/{id}/chain
pub async fn chain(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(report_id): IdPath,
) -> ApiResult<Json<Vec<ReportResponse>>> {
    let service = ReportService::new(state.service_context());
    Ok(Json(service.chain(report_id).await?))
}

/// Reports addressed to the caller
///
/// GET /reports/inbox
pub async fn inbox(State(state): State<AppState>, auth: AuthMember) -> ApiResult<Json<Vec<ReportResponse>>> {
    let service = ReportService::new(state.service_context());
    Ok(Json(service.inbox(auth.member_id).await?))
}

/// Reports the caller filed or forwarded
///
/// GET /reports/outbox
pub async fn outbox(State(state): State<AppState>, auth: AuthMember) -> ApiResult<Json<Vec<ReportResponse>>> {
    let service = ReportService::new(state.service_context());
    Ok(Json(service.outbox(auth.member_id).await?))
}
