//! Member registry handlers
//!
//! Registration, admission decisions and seat assignment.

use axum::{extract::State, Json};
use kpn_service::dto::{
    AssignSeatRequest, DecisionRequest, DisciplinaryActionResponse, MemberResponse,
    RegisterMemberRequest, RejectRequest, VacateSeatRequest,
};
use kpn_service::{DisciplinaryService, RegistryService};

use crate::extractors::{AuthMember, IdPath, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Apply for membership; the applicant has no token yet
///
/// POST /members
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterMemberRequest>,
) -> ApiResult<Created<MemberResponse>> {
    let service = RegistryService::new(state.service_context());
    Ok(Created(service.register(request).await?))
}

/// GET /members/@me
pub async fn get_current_member(
    State(state): State<AppState>,
    auth: AuthMember,
) -> ApiResult<Json<MemberResponse>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.get(auth.member_id).await?))
}

/// GET /members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(member_id): IdPath,
) -> ApiResult<Json<MemberResponse>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.get(member_id).await?))
}

/// Applications the caller may decide
///
/// GET /members/pending
pub async fn list_pending(State(state): State<AppState>, auth: AuthMember) -> ApiResult<Json<Vec<MemberResponse>>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.list_pending(auth.member_id).await?))
}

/// POST /members/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<DecisionRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.approve(auth.member_id, member_id, request).await?))
}

/// POST /members/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    ValidatedJson(request): ValidatedJson<RejectRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.reject(auth.member_id, member_id, request).await?))
}

/// PUT /members/{id}/seat
pub async fn assign_seat(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    ValidatedJson(request): ValidatedJson<AssignSeatRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.assign_seat(auth.member_id, member_id, request).await?))
}

/// POST /members/{id}/seat/vacate
pub async fn vacate_seat(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(member_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<VacateSeatRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.vacate(auth.member_id, member_id, request).await?))
}

/// Disciplinary record of one member
///
/// GET /members/{id}/disciplinary
pub async fn list_disciplinary(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(member_id): IdPath,
) -> ApiResult<Json<Vec<DisciplinaryActionResponse>>> {
    let service = DisciplinaryService::new(state.service_context());
    Ok(Json(service.list_for_member(member_id).await?))
}
