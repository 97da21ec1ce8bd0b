//! Disciplinary handlers
//!
//! Submission, the dismissal approval queue and resolution.

use axum::{extract::State, Json};
use kpn_service::dto::{DecisionRequest, DisciplinaryActionResponse, RejectRequest, SubmitDisciplinaryRequest};
use kpn_service::DisciplinaryService;

use crate::extractors::{AuthMember, IdPath, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /disciplinary
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<SubmitDisciplinaryRequest>,
) -> ApiResult<Created<DisciplinaryActionResponse>> {
    let service = DisciplinaryService::new(state.service_context());
    Ok(Created(service.submit(auth.member_id, request).await?))
}

/// Dismissals awaiting the caller's decision
///
/// GET /disciplinary/pending
pub async fn list_pending(
    State(state): State<AppState>,
    auth: AuthMember,
) -> ApiResult<Json<Vec<DisciplinaryActionResponse>>> {
    let service = DisciplinaryService::new(state.service_context());
    Ok(Json(service.list_pending(auth.member_id).await?))
}

/// GET /disciplinary/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(action_id): IdPath,
) -> ApiResult<Json<DisciplinaryActionResponse>> {
    let service = DisciplinaryService::new(state.service_context());
    Ok(Json(service.get(action_id).await?))
}

/// POST /disciplinary/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(action_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<DecisionRequest>,
) -> ApiResult<Json<DisciplinaryActionResponse>> {
    let service = DisciplinaryService::new(state.service_context());
    Ok(Json(service.approve(auth.member_id, action_id, request).await?))
}

/// POST /disciplinary/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(action_id): IdPath,
    ValidatedJson(request): ValidatedJson<RejectRequest>,
) -> ApiResult<Json<DisciplinaryActionResponse>> {
    let service = DisciplinaryService::new(state.service_context());
    Ok(Json(service.reject(auth.member_id, action_id, request).await?))
}

/// POST /disciplinary/{id}/resolve
pub async fn resolve(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(action_id): IdPath,
) -> ApiResult<Json<DisciplinaryActionResponse>> {
    let service = DisciplinaryService::new(state.service_context());
    Ok(Json(service.resolve(auth.member_id, action_id).await?))
}
