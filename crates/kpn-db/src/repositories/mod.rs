//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in kpn-core.
//! Every governance mutation runs in one transaction together with its
//! audit entry.

mod audit;
mod catalog;
mod content;
mod disciplinary;
mod error;
mod member;
mod report;

pub use audit::PgAuditRepository;
pub use catalog::PgCatalogRepository;
pub use content::PgContentRepository;
pub use disciplinary::PgDisciplinaryRepository;
pub use error::{map_db_error, map_unique_violation};
pub use member::PgMemberRepository;
pub use report::PgReportRepository;
