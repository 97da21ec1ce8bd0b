//! Duty and standing handlers

use axum::{extract::State, Json};
use chrono::Utc;
use kpn_service::dto::{AuditEntryResponse, DutyEventRequest, HistoryQuery, StandingResponse};
use kpn_service::{StandingService, SweepReport};

use crate::extractors::{AuthMember, IdPath, OptionalValidatedJson, QueryParams};
use crate::response::ApiResult;
use crate::state::AppState;

/// POST /members/{id}/duty/missed
pub async fn record_missed_duty(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<DutyEventRequest>,
) -> ApiResult<Json<StandingResponse>> {
    let service = StandingService::new(state.service_context());
    Ok(Json(service.record_missed_duty(auth.member_id, member_id, request).await?))
}

/// POST /members/{id}/duty/ignored-reminder
pub async fn record_ignored_reminder(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<DutyEventRequest>,
) -> ApiResult<Json<StandingResponse>> {
    let service = StandingService::new(state.service_context());
    Ok(Json(service.record_ignored_reminder(auth.member_id, member_id, request).await?))
}

/// POST /members/{id}/duty/reset
pub async fn reset_counters(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<DutyEventRequest>,
) -> ApiResult<Json<StandingResponse>> {
    let service = StandingService::new(state.service_context());
    Ok(Json(service.reset_counters(auth.member_id, member_id, request).await?))
}

/// POST /members/{id}/activity
pub async fn record_activity(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<DutyEventRequest>,
) -> ApiResult<Json<StandingResponse>> {
    let service = StandingService::new(state.service_context());
    Ok(Json(service.record_activity(auth.member_id, member_id, request).await?))
}

/// Refold a member's standing from the audit window
///
/// POST /members/{id}/standing
pub async fn recompute(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(member_id): IdPath,
) -> ApiResult<Json<StandingResponse>> {
    let service = StandingService::new(state.service_context());
    Ok(Json(service.recompute(member_id).await?))
}

/// GET /members/{id}/history?limit=50
pub async fn history(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(member_id): IdPath,
    QueryParams(query): QueryParams<HistoryQuery>,
) -> ApiResult<Json<Vec<AuditEntryResponse>>> {
    let service = StandingService::new(state.service_context());
    Ok(Json(service.history(member_id, query.limit).await?))
}

/// Recompute every approved member; top seat only
///
/// POST /standing/sweep
pub async fn sweep(State(state): State<AppState>, auth: AuthMember) -> ApiResult<Json<SweepReport>> {
    let service = StandingService::new(state.service_context());
    Ok(Json(service.sweep(auth.member_id, Utc::now()).await?))
}
