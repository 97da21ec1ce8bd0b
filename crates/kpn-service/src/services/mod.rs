//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`], checks the actor's
//! authority through the governance rules in `kpn-core`, and hands the
//! resulting change plus its audit entry to a repository in one call.

pub mod bootstrap;
pub mod catalog;
pub mod content;
pub mod context;
pub mod disciplinary;
pub mod dispatch;
pub mod error;
pub mod position;
pub mod registry;
pub mod report;
pub mod standing;

#[cfg(test)]
mod testing;

// Re-export all services for convenience
pub use bootstrap::{ensure_president, load_catalog};
pub use catalog::CatalogService;
pub use content::ContentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use disciplinary::DisciplinaryService;
pub use dispatch::{RecordingDispatcher, TracingDispatcher};
pub use error::{ServiceError, ServiceResult};
pub use position::PositionService;
pub use registry::RegistryService;
pub use report::{EscalationOutcome, ReportService};
pub use standing::{StandingService, SweepReport};
