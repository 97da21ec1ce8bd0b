//! Catalog handlers
//!
//! Read-only views of the jurisdiction tree and the seat catalog. These
//! are public: the membership application form needs them before the
//! applicant has an identity.

use axum::{extract::State, Json};
use kpn_service::dto::{
    JurisdictionDetailResponse, JurisdictionQuery, JurisdictionResponse, MemberResponse, SeatQuery,
    SeatResponse,
};
use kpn_service::{CatalogService, RegistryService};

use crate::extractors::{AuthMember, IdPath, QueryParams};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /jurisdictions?level=LGA
pub async fn list_jurisdictions(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<JurisdictionQuery>,
) -> ApiResult<Json<Vec<JurisdictionResponse>>> {
    let service = CatalogService::new(state.service_context());
    Ok(Json(service.jurisdictions(query.level)?))
}

/// GET /jurisdictions/{id}
pub async fn get_jurisdiction(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<JurisdictionDetailResponse>> {
    let service = CatalogService::new(state.service_context());
    Ok(Json(service.jurisdiction(id)?))
}

/// Members attached to one jurisdiction
///
/// GET /jurisdictions/{id}/members
pub async fn list_jurisdiction_members(
    State(state): State<AppState>,
    _auth: AuthMember,
    IdPath(id): IdPath,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let service = RegistryService::new(state.service_context());
    Ok(Json(service.list_by_jurisdiction(id).await?))
}

/// GET /seats?tier=ZONAL
pub async fn list_seats(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SeatQuery>,
) -> Json<Vec<SeatResponse>> {
    let service = CatalogService::new(state.service_context());
    Json(service.seats(query.tier))
}
