//! Service context - dependency container for services
//!
//! Holds the loaded catalog, the six repositories, the notification
//! dispatcher and the ID generator every workflow needs.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use kpn_common::GovernanceConfig;
use kpn_core::governance::Position;
use kpn_core::traits::{
    AuditRepository, CatalogRepository, ContentRepository, DisciplinaryRepository,
    MemberRepository, NotificationDispatcher, ReportRepository,
};
use kpn_core::{
    AuditEntry, AuditKind, Catalog, DomainError, DomainEvent, Member, Rung, Snowflake,
    SnowflakeGenerator,
};
use kpn_db::{
    MemoryStore, PgAuditRepository, PgCatalogRepository, PgContentRepository,
    PgDisciplinaryRepository, PgMemberRepository, PgPool, PgReportRepository,
};

use super::dispatch::TracingDispatcher;
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    catalog: Arc<Catalog>,

    // Repositories
    catalog_repo: Arc<dyn CatalogRepository>,
    member_repo: Arc<dyn MemberRepository>,
    disciplinary_repo: Arc<dyn DisciplinaryRepository>,
    report_repo: Arc<dyn ReportRepository>,
    content_repo: Arc<dyn ContentRepository>,
    audit_repo: Arc<dyn AuditRepository>,

    dispatcher: Arc<dyn NotificationDispatcher>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    governance: GovernanceConfig,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog.as_ref()
    }

    pub fn governance(&self) -> &GovernanceConfig {
        &self.governance
    }

    // === Repositories ===

    pub fn catalog_repo(&self) -> &dyn CatalogRepository {
        self.catalog_repo.as_ref()
    }

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn disciplinary_repo(&self) -> &dyn DisciplinaryRepository {
        self.disciplinary_repo.as_ref()
    }

    pub fn report_repo(&self) -> &dyn ReportRepository {
        self.report_repo.as_ref()
    }

    pub fn content_repo(&self) -> &dyn ContentRepository {
        self.content_repo.as_ref()
    }

    pub fn audit_repo(&self) -> &dyn AuditRepository {
        self.audit_repo.as_ref()
    }

    // === Helpers ===

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Fresh audit entry performed by `actor` against `target`
    pub fn audit(&self, kind: AuditKind, actor: Option<Snowflake>, target: Snowflake) -> AuditEntry {
        AuditEntry::new(self.generate_id(), kind, actor, target)
    }

    /// Same as [`Self::audit`] with a before/after image attached
    pub fn audit_change<B: Serialize, A: Serialize>(
        &self,
        kind: AuditKind,
        actor: Snowflake,
        target: Snowflake,
        before: &B,
        after: &A,
    ) -> AuditEntry {
        self.audit(kind, Some(actor), target).with_change(before, after)
    }

    /// Hand an event to the dispatcher; failures are logged and dropped
    pub async fn notify(&self, event: DomainEvent) {
        if let Err(e) = self.dispatcher.dispatch(&event).await {
            warn!(event_type = event.event_type(), error = %e, "Notification dispatch failed");
        }
    }

    pub async fn member(&self, id: Snowflake) -> ServiceResult<Member> {
        self.member_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::MemberNotFound(id).into())
    }

    /// Load an acting member together with the authority it currently carries
    pub async fn acting(&self, id: Snowflake) -> ServiceResult<(Member, Position)> {
        let member = self.member(id).await?;
        let position = self.catalog.position_of(&member);
        Ok((member, position))
    }

    /// Rank a member holds on paper, even while suspended
    ///
    /// Used for the target side of authority checks so a suspension does
    /// not expose a member to lower-ranked issuers.
    pub fn rank_of(&self, member: &Member) -> Position {
        let holds_top = member.seat_id.is_some_and(|id| self.catalog.seats.is_top(id));
        let rung = if member.approval_status.occupies_seat() {
            Rung::from_tier(member.role_tier, holds_top)
        } else {
            Rung::General
        };
        Position {
            rung,
            ..self.catalog.position_of(member)
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("jurisdictions", &self.catalog.tree.len())
            .field("repositories", &"...")
            .field("governance", &self.governance)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    catalog: Option<Arc<Catalog>>,
    catalog_repo: Option<Arc<dyn CatalogRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    disciplinary_repo: Option<Arc<dyn DisciplinaryRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
    content_repo: Option<Arc<dyn ContentRepository>>,
    audit_repo: Option<Arc<dyn AuditRepository>>,
    dispatcher: Option<Arc<dyn NotificationDispatcher>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    governance: Option<GovernanceConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Back every repository with one in-memory store
    pub fn memory(self, store: &MemoryStore) -> Self {
        self.catalog_repo(Arc::new(store.clone()))
            .member_repo(Arc::new(store.clone()))
            .disciplinary_repo(Arc::new(store.clone()))
            .report_repo(Arc::new(store.clone()))
            .content_repo(Arc::new(store.clone()))
            .audit_repo(Arc::new(store.clone()))
    }

    /// Back every repository with PostgreSQL
    pub fn postgres(self, pool: &PgPool) -> Self {
        self.catalog_repo(Arc::new(PgCatalogRepository::new(pool.clone())))
            .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
            .disciplinary_repo(Arc::new(PgDisciplinaryRepository::new(pool.clone())))
            .report_repo(Arc::new(PgReportRepository::new(pool.clone())))
            .content_repo(Arc::new(PgContentRepository::new(pool.clone())))
            .audit_repo(Arc::new(PgAuditRepository::new(pool.clone())))
    }

    pub fn catalog_repo(mut self, repo: Arc<dyn CatalogRepository>) -> Self {
        self.catalog_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn disciplinary_repo(mut self, repo: Arc<dyn DisciplinaryRepository>) -> Self {
        self.disciplinary_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn content_repo(mut self, repo: Arc<dyn ContentRepository>) -> Self {
        self.content_repo = Some(repo);
        self
    }

    pub fn audit_repo(mut self, repo: Arc<dyn AuditRepository>) -> Self {
        self.audit_repo = Some(repo);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn governance(mut self, governance: GovernanceConfig) -> Self {
        self.governance = Some(governance);
        self
    }

    /// Build the ServiceContext
    ///
    /// The dispatcher defaults to logging events and the governance settings
    /// to their defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let required = |name: &str| ServiceError::validation(format!("{name} is required"));

        Ok(ServiceContext {
            catalog: self.catalog.ok_or_else(|| required("catalog"))?,
            catalog_repo: self.catalog_repo.ok_or_else(|| required("catalog_repo"))?,
            member_repo: self.member_repo.ok_or_else(|| required("member_repo"))?,
            disciplinary_repo: self
                .disciplinary_repo
                .ok_or_else(|| required("disciplinary_repo"))?,
            report_repo: self.report_repo.ok_or_else(|| required("report_repo"))?,
            content_repo: self.content_repo.ok_or_else(|| required("content_repo"))?,
            audit_repo: self.audit_repo.ok_or_else(|| required("audit_repo"))?,
            dispatcher: self
                .dispatcher
                .unwrap_or_else(|| Arc::new(TracingDispatcher)),
            snowflake_generator: self
                .snowflake_generator
                .ok_or_else(|| required("snowflake_generator"))?,
            governance: self.governance.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpn_core::{ApprovalStatus, SeedData, Tier};

    fn catalog() -> Catalog {
        let seed = SeedData::kebbi();
        Catalog::build(seed.jurisdictions, seed.seats).unwrap()
    }

    #[test]
    fn test_build_requires_repositories() {
        let err = ServiceContextBuilder::new()
            .catalog(catalog())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: catalog_repo is required");
    }

    #[test]
    fn test_memory_builder_fills_every_repository() {
        let ctx = ServiceContextBuilder::new()
            .catalog(catalog())
            .memory(&MemoryStore::new())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap();
        assert!(ctx.governance().auto_escalate);
        assert_ne!(ctx.generate_id(), ctx.generate_id());
    }

    #[test]
    fn test_rank_survives_suspension() {
        let ctx = ServiceContextBuilder::new()
            .catalog(catalog())
            .memory(&MemoryStore::new())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap();

        let lga = ctx.catalog().tree.at_level(kpn_core::Level::Lga)[0].id;
        let seat = ctx.catalog().seats.seats_at(Tier::Lga)[0].id;
        let mut member = Member::new(Snowflake::new(77), "Musa Aliyu", Tier::Lga, Some(lga)).with_seat(seat);
        member.set_status(ApprovalStatus::Suspended);

        assert_eq!(ctx.catalog().position_of(&member).rung, Rung::General);
        assert_eq!(ctx.rank_of(&member).rung, Rung::Lga);
    }
}
