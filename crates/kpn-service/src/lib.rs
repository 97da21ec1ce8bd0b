//! # kpn-service
//!
//! Application layer: the governance workflows that sit between the HTTP
//! surface and storage, plus the request/response DTOs.

pub mod dto;
pub mod services;

pub use services::{
    ensure_president, load_catalog, CatalogService, ContentService, DisciplinaryService, EscalationOutcome, PositionService,
    RegistryService, ReportService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, StandingService, SweepReport, RecordingDispatcher, TracingDispatcher,
};
