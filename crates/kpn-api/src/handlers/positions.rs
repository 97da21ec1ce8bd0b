//! Promotion, demotion and swap handlers

use axum::{extract::State, Json};
use kpn_service::dto::{DemoteRequest, MemberResponse, PromoteRequest, SwapRequest, SwapResponse};
use kpn_service::PositionService;

use crate::extractors::{AuthMember, IdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// POST /members/{id}/promote
pub async fn promote(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    ValidatedJson(request): ValidatedJson<PromoteRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = PositionService::new(state.service_context());
    Ok(Json(service.promote(auth.member_id, member_id, request).await?))
}

/// POST /members/{id}/demote
pub async fn demote(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    ValidatedJson(request): ValidatedJson<DemoteRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = PositionService::new(state.service_context());
    Ok(Json(service.demote(auth.member_id, member_id, request).await?))
}

/// POST /positions/swap
pub async fn swap(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<SwapRequest>,
) -> ApiResult<Json<SwapResponse>> {
    let service = PositionService::new(state.service_context());
    Ok(Json(service.swap(auth.member_id, request).await?))
}
