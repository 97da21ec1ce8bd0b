//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_log;
mod catalog;
mod content;
mod disciplinary;
mod member;
mod report;

pub use audit_log::AuditEntryModel;
pub use catalog::{JurisdictionModel, SeatModel};
pub use content::ContentItemModel;
pub use disciplinary::DisciplinaryActionModel;
pub use member::MemberModel;
pub use report::ReportModel;
