//! Domain entities - core business objects

mod audit;
mod content;
mod disciplinary;
mod jurisdiction;
mod member;
mod report;

pub use audit::{AuditEntry, AuditKind};
pub use content::ContentItem;
pub use disciplinary::DisciplinaryAction;
pub use jurisdiction::{Jurisdiction, Seat};
pub use member::{Member, Placement, PositionSnapshot, StatusChange};
pub use report::{Report, ReportDraft};
