//! Campaign and media content handlers

use axum::{extract::State, Json};
use kpn_service::dto::{ContentResponse, CreateContentRequest, EditContentRequest, RejectRequest};
use kpn_service::ContentService;

use crate::extractors::{AuthMember, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /content
pub async fn create(
    State(state): State<AppState>,
    auth: AuthMember,
    ValidatedJson(request): ValidatedJson<CreateContentRequest>,
) -> ApiResult<Created<ContentResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Created(service.create(auth.member_id, request).await?))
}

/// PATCH /content/{id}
pub async fn edit(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(content_id): IdPath,
    ValidatedJson(request): ValidatedJson<EditContentRequest>,
) -> ApiResult<Json<ContentResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.edit(auth.member_id, content_id, request).await?))
}

/// POST /content/{id}/submit
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(content_id): IdPath,
) -> ApiResult<Json<ContentResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.submit(auth.member_id, content_id).await?))
}

/// POST /content/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(content_id): IdPath,
) -> ApiResult<Json<ContentResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.approve(auth.member_id, content_id).await?))
}

/// POST /content/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthMember,
    IdPath(content_id): IdPath,
    ValidatedJson(request): ValidatedJson<RejectRequest>,
) -> ApiResult<Json<ContentResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.reject(auth.member_id, content_id, request).await?))
}

/// GET /content/{id}
pub async fn get(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(content_id): IdPath,
) -> ApiResult<Json<ContentResponse>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.get(content_id).await?))
}

/// GET /content/pending
pub async fn list_pending(State(state): State<AppState>, auth: AuthMember) -> ApiResult<Json<Vec<ContentResponse>>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.list_pending(auth.member_id).await?))
}

/// GET /members/{id}/content
pub async fn list_by_author(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(author_id): IdPath,
) -> ApiResult<Json<Vec<ContentResponse>>> {
    let service = ContentService::new(state.service_context());
    Ok(Json(service.list_by_author(author_id).await?))
}
