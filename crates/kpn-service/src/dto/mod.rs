//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AssignSeatRequest, CreateContentRequest, CreateReportRequest, DecisionRequest, DemoteRequest,
    DutyEventRequest, EditContentRequest, HistoryQuery, JurisdictionQuery, PromoteRequest,
    RegisterMemberRequest, RejectRequest, ReviewReportRequest, SeatQuery, SubmitDisciplinaryRequest,
    SwapRequest, VacateSeatRequest,
};

pub use responses::{
    ApiResponse, ApproverRouteResponse, AuditEntryResponse, ContentResponse,
    DisciplinaryActionResponse, EscalationResponse, HealthChecks, HealthResponse,
    JurisdictionDetailResponse, JurisdictionResponse, MemberResponse, ReadinessResponse,
    ReportResponse, ReviewResponse, SeatResponse, StandingResponse, SwapResponse,
};

pub use mappers::MemberView;
