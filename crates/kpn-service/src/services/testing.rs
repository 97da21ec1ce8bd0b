//! Shared fixtures for service tests

use std::sync::Arc;

use kpn_common::GovernanceConfig;
use kpn_core::{
    ApprovalStatus, AuditEntry, AuditKind, Catalog, Level, Member, MemberRepository, SeedData,
    Snowflake, SnowflakeGenerator, Tier,
};
use kpn_db::MemoryStore;

use super::context::ServiceContext;
use super::dispatch::RecordingDispatcher;

/// Context over a fresh in-memory store seeded with the Kebbi catalog
pub struct Harness {
    pub store: MemoryStore,
    pub ctx: ServiceContext,
    pub events: RecordingDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_governance(GovernanceConfig::default())
    }

    pub fn with_governance(governance: GovernanceConfig) -> Self {
        let seed = SeedData::kebbi();
        let catalog = Catalog::build(seed.jurisdictions, seed.seats).unwrap();
        let store = MemoryStore::new();
        let events = RecordingDispatcher::new();
        let ctx = ServiceContext::builder()
            .catalog(catalog)
            .memory(&store)
            .dispatcher(Arc::new(events.clone()))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(7)))
            .governance(governance)
            .build()
            .unwrap();
        Self { store, ctx, events }
    }

    pub fn zone(&self, index: usize) -> Snowflake {
        self.ctx.catalog().tree.at_level(Level::Zone)[index].id
    }

    /// First child of `parent`
    pub fn first_child(&self, parent: Snowflake) -> Snowflake {
        self.ctx.catalog().tree.children(parent).unwrap()[0].id
    }

    /// Seat `number` (1-based) of `tier`; seat 1 is the coordinator
    pub fn seat(&self, tier: Tier, number: i32) -> Snowflake {
        self.ctx
            .catalog()
            .seats
            .seats_at(tier)
            .into_iter()
            .find(|s| s.seat_number == number)
            .unwrap()
            .id
    }

    pub fn president_seat(&self) -> Snowflake {
        self.ctx.catalog().seats.top_seat().id
    }

    pub fn publisher_seat(&self) -> Snowflake {
        self.ctx.catalog().seats.publisher_seat().unwrap().id
    }

    /// Insert an APPROVED member directly, bypassing the admission workflow
    pub async fn approved(
        &self,
        name: &str,
        tier: Tier,
        seat: Option<Snowflake>,
        jurisdiction: Option<Snowflake>,
    ) -> Snowflake {
        self.insert(name, tier, seat, jurisdiction, ApprovalStatus::Approved).await
    }

    pub async fn insert(
        &self,
        name: &str,
        tier: Tier,
        seat: Option<Snowflake>,
        jurisdiction: Option<Snowflake>,
        status: ApprovalStatus,
    ) -> Snowflake {
        let id = self.ctx.generate_id();
        let mut member = Member::new(id, name, tier, jurisdiction);
        if let Some(seat) = seat {
            member = member.with_seat(seat);
        }
        member.set_status(status);
        let audit = AuditEntry::new(self.ctx.generate_id(), AuditKind::MemberRegistered, Some(id), id);
        MemberRepository::create(&self.store, &member, &audit).await.unwrap();
        id
    }

    pub async fn president(&self) -> Snowflake {
        self.approved("Abubakar Bagudu", Tier::State, Some(self.president_seat()), None)
            .await
    }

    pub async fn member(&self, id: Snowflake) -> Member {
        self.ctx.member(id).await.unwrap()
    }
}
