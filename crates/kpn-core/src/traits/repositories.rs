//! Repository traits (ports) - define the interface for data access
//!
//! Every mutating method that belongs to a governance operation takes the
//! audit entry for that operation and persists it in the same transaction,
//! so a committed change always has its audit record and a rolled-back one
//! never does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    AuditEntry, ContentItem, DisciplinaryAction, Jurisdiction, Member, Placement, Report, Seat,
    StatusChange,
};
use crate::error::DomainError;
use crate::governance::StandingInputs;
use crate::value_objects::{ApprovalStatus, PublishState, ReportStatus, Snowflake, Standing};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Catalog Repository
// ============================================================================

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert the seed dataset; rows that already exist are left untouched
    async fn seed(&self, jurisdictions: &[Jurisdiction], seats: &[Seat]) -> RepoResult<()>;

    async fn list_jurisdictions(&self) -> RepoResult<Vec<Jurisdiction>>;

    async fn list_seats(&self) -> RepoResult<Vec<Seat>>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Member>>;

    /// Member currently occupying (seat, jurisdiction), if any
    ///
    /// Occupying means APPROVED or SUSPENDED.
    async fn find_seat_holder(
        &self,
        seat_id: Snowflake,
        jurisdiction_id: Option<Snowflake>,
    ) -> RepoResult<Option<Member>>;

    /// Members bound to a jurisdiction node
    async fn list_by_jurisdiction(&self, jurisdiction_id: Snowflake) -> RepoResult<Vec<Member>>;

    async fn list_by_status(&self, status: ApprovalStatus) -> RepoResult<Vec<Member>>;

    /// Insert a new registration
    async fn create(&self, member: &Member, audit: &AuditEntry) -> RepoResult<()>;

    /// Rebind tier, seat and jurisdiction in one step
    ///
    /// The write only happens while the member still has status
    /// `expected`; otherwise `InvalidTransition` is returned. Fails with
    /// `SeatOccupied` when another occupying member holds the target key.
    /// The old seat is released by the same write.
    async fn place(
        &self,
        member_id: Snowflake,
        expected: ApprovalStatus,
        placement: &Placement,
        audit: &AuditEntry,
    ) -> RepoResult<Member>;

    /// Change approval status
    ///
    /// With `expected` set the write only happens if the member still has
    /// that status; otherwise `AlreadyResolved` is returned. Terminal
    /// negative statuses vacate the seat in the same write. Approving a
    /// member bound to an occupied key fails with `SeatOccupied`.
    async fn set_status(&self, change: &StatusChange, audit: &AuditEntry) -> RepoResult<Member>;

    /// Exchange the placements of two members
    ///
    /// Both members must still be APPROVED and seated when the write
    /// happens. One side is cleared first so the occupancy constraint holds
    /// at every step; both audit entries are written in the same
    /// transaction.
    async fn swap_positions(
        &self,
        a: Snowflake,
        b: Snowflake,
        audits: [&AuditEntry; 2],
    ) -> RepoResult<(Member, Member)>;

    /// Cache a standing recomputation; `audit` is present when the
    /// classification changed
    async fn update_standing(
        &self,
        member_id: Snowflake,
        inputs: &StandingInputs,
        standing: Standing,
        audit: Option<&AuditEntry>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Disciplinary Repository
// ============================================================================

/// Effects on the target member are applied with [`StatusChange`]. When the
/// change carries an `expected` status and the member no longer has it, the
/// effect is skipped and the action write still happens.
#[async_trait]
pub trait DisciplinaryRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DisciplinaryAction>>;

    /// Actions against a member, newest first
    async fn list_by_target(&self, member_id: Snowflake) -> RepoResult<Vec<DisciplinaryAction>>;

    /// Dismissals awaiting an approver, oldest first
    async fn list_pending(&self) -> RepoResult<Vec<DisciplinaryAction>>;

    async fn create(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()>;

    /// Persist an approve/reject decision
    ///
    /// Conditional on the stored approval status still being PENDING; a
    /// lost race returns `AlreadyResolved` and nothing is written.
    async fn decide(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()>;

    /// Persist a resolution; `AlreadyResolved` if it was resolved meanwhile
    async fn resolve(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()>;
}

// ============================================================================
// Report Repository
// ============================================================================

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Report>>;

    /// Reports addressed to a member, newest first
    async fn list_submitted_to(&self, member_id: Snowflake) -> RepoResult<Vec<Report>>;

    /// Reports filed by a member, newest first
    async fn list_submitted_by(&self, member_id: Snowflake) -> RepoResult<Vec<Report>>;

    async fn find_children(&self, report_id: Snowflake) -> RepoResult<Vec<Report>>;

    async fn create(&self, report: &Report, audit: Option<&AuditEntry>) -> RepoResult<()>;

    /// Write back a report whose stored status is still `expected`
    async fn update(
        &self,
        report: &Report,
        expected: ReportStatus,
        audit: &AuditEntry,
    ) -> RepoResult<()>;

    /// Insert `child` and flip `parent` to ESCALATED atomically
    ///
    /// Guarded by the stored parent being APPROVED and not yet escalated;
    /// otherwise `AlreadyEscalated` and no child is written.
    async fn escalate(&self, parent: &Report, child: &Report, audit: &AuditEntry) -> RepoResult<()>;

    /// Flag an approved report whose next-tier supervisor seat is vacant
    async fn mark_escalation_pending(&self, report_id: Snowflake, audit: &AuditEntry) -> RepoResult<()>;
}

// ============================================================================
// Content Repository
// ============================================================================

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ContentItem>>;

    async fn list_by_state(&self, state: PublishState) -> RepoResult<Vec<ContentItem>>;

    async fn list_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<ContentItem>>;

    /// Insert a new draft together with its audit entry
    async fn create(&self, item: &ContentItem, audit: &AuditEntry) -> RepoResult<()>;

    /// Write back an item whose stored state is still `expected`
    async fn update(
        &self,
        item: &ContentItem,
        expected: PublishState,
        audit: Option<&AuditEntry>,
    ) -> RepoResult<()>;
}

// ============================================================================
// Audit Repository
// ============================================================================

#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append a standalone entry
    async fn append(&self, entry: &AuditEntry) -> RepoResult<()>;

    /// Entries the member performed or was targeted by, created at or after
    /// `since`, oldest first
    async fn list_for_member(
        &self,
        member_id: Snowflake,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<AuditEntry>>;

    /// Entries targeting a member, newest first
    async fn list_by_target(&self, member_id: Snowflake, limit: i64) -> RepoResult<Vec<AuditEntry>>;
}
