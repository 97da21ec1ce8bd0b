//! # kpn-core
//!
//! Domain layer of the governance engine: entities, value objects, the pure
//! approval and standing rules, repository traits, domain events and the
//! seed catalog. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod governance;
pub mod seed;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuditEntry, AuditKind, ContentItem, DisciplinaryAction, Jurisdiction, Member, Placement,
    PositionSnapshot, Report, ReportDraft, Seat, StatusChange,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use governance::{Catalog, JurisdictionTree, Position, SeatCatalog, StandingInputs};
pub use seed::SeedData;
pub use traits::{
    AuditRepository, CatalogRepository, ContentRepository, DisciplinaryRepository,
    MemberRepository, NotificationDispatcher, RepoResult, ReportRepository,
};
pub use value_objects::{
    ActionApproval, ActionStatus, ApprovalStatus, Capabilities, ContentKind, DisciplinaryType,
    Level, PublishState, ReportStatus, ReviewOutcome, Rung, SeatFlags, Snowflake,
    SnowflakeGenerator, SnowflakeParseError, Standing, Tier, TierPath,
};
