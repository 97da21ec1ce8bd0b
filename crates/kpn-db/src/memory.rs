//! In-process storage backend
//!
//! Implements every repository trait over plain maps guarded by a single
//! `parking_lot::Mutex`. Each trait method takes the lock once, so a
//! mutation and its audit entry become visible together, and the checks
//! the PostgreSQL backend delegates to constraints (single occupancy, one
//! child per escalated report, compare-and-swap on status) are made under
//! the same lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use kpn_core::entities::{
    AuditEntry, ContentItem, DisciplinaryAction, Jurisdiction, Member, Placement, Report, Seat,
    StatusChange,
};
use kpn_core::error::DomainError;
use kpn_core::governance::StandingInputs;
use kpn_core::traits::{
    AuditRepository, CatalogRepository, ContentRepository, DisciplinaryRepository,
    MemberRepository, RepoResult, ReportRepository,
};
use kpn_core::value_objects::{
    ActionApproval, ApprovalStatus, PublishState, ReportStatus, Snowflake, Standing,
};

#[derive(Default)]
struct State {
    jurisdictions: BTreeMap<Snowflake, Jurisdiction>,
    seats: BTreeMap<Snowflake, Seat>,
    members: HashMap<Snowflake, Member>,
    actions: HashMap<Snowflake, DisciplinaryAction>,
    reports: HashMap<Snowflake, Report>,
    content: HashMap<Snowflake, ContentItem>,
    audit: Vec<AuditEntry>,
}

impl State {
    fn member_mut(&mut self, id: Snowflake) -> RepoResult<&mut Member> {
        self.members.get_mut(&id).ok_or(DomainError::MemberNotFound(id))
    }

    /// Occupying holder of a key other than `except`
    fn holder_of(
        &self,
        seat_id: Snowflake,
        jurisdiction_id: Option<Snowflake>,
        except: Option<Snowflake>,
    ) -> Option<&Member> {
        self.members.values().find(|m| {
            Some(m.id) != except
                && m.occupies_seat()
                && m.seat_id == Some(seat_id)
                && m.jurisdiction_id == jurisdiction_id
        })
    }

    /// Fail if `member` would collide with another occupant in its new shape
    fn check_occupancy(&self, member: &Member) -> RepoResult<()> {
        if let (true, Some(seat_id)) = (member.approval_status.occupies_seat(), member.seat_id) {
            if self.holder_of(seat_id, member.jurisdiction_id, Some(member.id)).is_some() {
                return Err(DomainError::SeatOccupied {
                    seat_id,
                    jurisdiction_id: member.jurisdiction_id,
                });
            }
        }
        Ok(())
    }

    /// Disciplinary effect: skipped when the guard status no longer matches
    fn apply_effect(&mut self, change: &StatusChange) -> RepoResult<()> {
        let member = self.member_mut(change.member_id)?;
        if change.expected.is_some_and(|expected| expected != member.approval_status) {
            debug!(member_id = %change.member_id, "Member status moved on; effect skipped");
            return Ok(());
        }
        member.set_status(change.status);
        Ok(())
    }
}

/// Shared in-memory store; cloning yields another handle to the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Snowflake)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn oldest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Snowflake)) {
    items.sort_by_key(|item| key(item));
}

// ============================================================================
// Catalog
// ============================================================================

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn seed(&self, jurisdictions: &[Jurisdiction], seats: &[Seat]) -> RepoResult<()> {
        let mut state = self.state.lock();
        for node in jurisdictions {
            state.jurisdictions.entry(node.id).or_insert_with(|| node.clone());
        }
        for seat in seats {
            state.seats.entry(seat.id).or_insert_with(|| seat.clone());
        }
        Ok(())
    }

    async fn list_jurisdictions(&self) -> RepoResult<Vec<Jurisdiction>> {
        Ok(self.state.lock().jurisdictions.values().cloned().collect())
    }

    async fn list_seats(&self) -> RepoResult<Vec<Seat>> {
        Ok(self.state.lock().seats.values().cloned().collect())
    }
}

// ============================================================================
// Members
// ============================================================================

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Member>> {
        Ok(self.state.lock().members.get(&id).cloned())
    }

    async fn find_seat_holder(
        &self,
        seat_id: Snowflake,
        jurisdiction_id: Option<Snowflake>,
    ) -> RepoResult<Option<Member>> {
        Ok(self
            .state
            .lock()
            .holder_of(seat_id, jurisdiction_id, None)
            .cloned())
    }

    async fn list_by_jurisdiction(&self, jurisdiction_id: Snowflake) -> RepoResult<Vec<Member>> {
        let state = self.state.lock();
        let mut members: Vec<Member> = state
            .members
            .values()
            .filter(|m| m.jurisdiction_id == Some(jurisdiction_id))
            .cloned()
            .collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }

    async fn list_by_status(&self, status: ApprovalStatus) -> RepoResult<Vec<Member>> {
        let state = self.state.lock();
        let mut members: Vec<Member> = state
            .members
            .values()
            .filter(|m| m.approval_status == status)
            .cloned()
            .collect();
        oldest_first(&mut members, |m| (m.created_at, m.id));
        Ok(members)
    }

    async fn create(&self, member: &Member, audit: &AuditEntry) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.members.contains_key(&member.id) {
            return Err(DomainError::ValidationError(format!(
                "member {} already exists",
                member.id
            )));
        }
        state.check_occupancy(member)?;
        state.members.insert(member.id, member.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn place(
        &self,
        member_id: Snowflake,
        expected: ApprovalStatus,
        placement: &Placement,
        audit: &AuditEntry,
    ) -> RepoResult<Member> {
        let mut state = self.state.lock();
        let mut updated = state
            .members
            .get(&member_id)
            .cloned()
            .ok_or(DomainError::MemberNotFound(member_id))?;
        updated.ensure_status(expected)?;
        updated.place(placement);
        state.check_occupancy(&updated)?;

        state.members.insert(member_id, updated.clone());
        state.audit.push(audit.clone());
        Ok(updated)
    }

    async fn set_status(&self, change: &StatusChange, audit: &AuditEntry) -> RepoResult<Member> {
        let mut state = self.state.lock();
        let mut updated = state
            .members
            .get(&change.member_id)
            .cloned()
            .ok_or(DomainError::MemberNotFound(change.member_id))?;
        if change.expected.is_some_and(|expected| expected != updated.approval_status) {
            return Err(DomainError::AlreadyResolved(change.member_id));
        }
        updated.set_status(change.status);
        state.check_occupancy(&updated)?;

        state.members.insert(change.member_id, updated.clone());
        state.audit.push(audit.clone());
        Ok(updated)
    }

    async fn swap_positions(
        &self,
        a: Snowflake,
        b: Snowflake,
        audits: [&AuditEntry; 2],
    ) -> RepoResult<(Member, Member)> {
        let mut state = self.state.lock();
        let mut member_a = state.members.get(&a).cloned().ok_or(DomainError::MemberNotFound(a))?;
        let mut member_b = state.members.get(&b).cloned().ok_or(DomainError::MemberNotFound(b))?;
        member_a.ensure_swappable()?;
        member_b.ensure_swappable()?;

        let placement_a = member_a.placement();
        member_a.place(&member_b.placement());
        member_b.place(&placement_a);

        // Both keys were held by these two members, so no third party collides
        state.members.insert(a, member_a.clone());
        state.members.insert(b, member_b.clone());
        state.audit.extend(audits.into_iter().cloned());
        Ok((member_a, member_b))
    }

    async fn update_standing(
        &self,
        member_id: Snowflake,
        inputs: &StandingInputs,
        standing: Standing,
        audit: Option<&AuditEntry>,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        let member = state.member_mut(member_id)?;
        member.last_activity_at = inputs.last_activity_at;
        member.missed_duty_count = inputs.missed_duty_count;
        member.ignored_reminder_count = inputs.ignored_reminder_count;
        member.computed_standing = standing;
        if let Some(audit) = audit {
            state.audit.push(audit.clone());
        }
        Ok(())
    }
}

// ============================================================================
// Disciplinary actions
// ============================================================================

#[async_trait]
impl DisciplinaryRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DisciplinaryAction>> {
        Ok(self.state.lock().actions.get(&id).cloned())
    }

    async fn list_by_target(&self, member_id: Snowflake) -> RepoResult<Vec<DisciplinaryAction>> {
        let state = self.state.lock();
        let mut actions: Vec<DisciplinaryAction> = state
            .actions
            .values()
            .filter(|a| a.target_member_id == member_id)
            .cloned()
            .collect();
        newest_first(&mut actions, |a| (a.created_at, a.id));
        Ok(actions)
    }

    async fn list_pending(&self) -> RepoResult<Vec<DisciplinaryAction>> {
        let state = self.state.lock();
        let mut actions: Vec<DisciplinaryAction> = state
            .actions
            .values()
            .filter(|a| a.awaits_approval())
            .cloned()
            .collect();
        oldest_first(&mut actions, |a| (a.created_at, a.id));
        Ok(actions)
    }

    async fn create(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        if let Some(change) = effect {
            state.apply_effect(change)?;
        }
        state.actions.insert(action.id, action.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn decide(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        let stored = state
            .actions
            .get(&action.id)
            .ok_or(DomainError::ActionNotFound(action.id))?;
        if stored.approval_status != ActionApproval::Pending {
            return Err(DomainError::AlreadyResolved(action.id));
        }
        if let Some(change) = effect {
            state.apply_effect(change)?;
        }
        state.actions.insert(action.id, action.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn resolve(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        let stored = state
            .actions
            .get(&action.id)
            .ok_or(DomainError::ActionNotFound(action.id))?;
        if stored.is_resolved() {
            return Err(DomainError::AlreadyResolved(action.id));
        }
        if let Some(change) = effect {
            state.apply_effect(change)?;
        }
        state.actions.insert(action.id, action.clone());
        state.audit.push(audit.clone());
        Ok(())
    }
}

// ============================================================================
// Reports
// ============================================================================

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Report>> {
        Ok(self.state.lock().reports.get(&id).cloned())
    }

    async fn list_submitted_to(&self, member_id: Snowflake) -> RepoResult<Vec<Report>> {
        let state = self.state.lock();
        let mut reports: Vec<Report> = state
            .reports
            .values()
            .filter(|r| r.submitted_to_id == Some(member_id))
            .cloned()
            .collect();
        newest_first(&mut reports, |r| (r.created_at, r.id));
        Ok(reports)
    }

    async fn list_submitted_by(&self, member_id: Snowflake) -> RepoResult<Vec<Report>> {
        let state = self.state.lock();
        let mut reports: Vec<Report> = state
            .reports
            .values()
            .filter(|r| r.submitted_by_id == member_id)
            .cloned()
            .collect();
        newest_first(&mut reports, |r| (r.created_at, r.id));
        Ok(reports)
    }

    async fn find_children(&self, report_id: Snowflake) -> RepoResult<Vec<Report>> {
        let state = self.state.lock();
        let mut reports: Vec<Report> = state
            .reports
            .values()
            .filter(|r| r.parent_report_id == Some(report_id))
            .cloned()
            .collect();
        oldest_first(&mut reports, |r| (r.created_at, r.id));
        Ok(reports)
    }

    async fn create(&self, report: &Report, audit: Option<&AuditEntry>) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.reports.contains_key(&report.id) {
            return Err(DomainError::ValidationError(format!(
                "report {} already exists",
                report.id
            )));
        }
        state.reports.insert(report.id, report.clone());
        if let Some(audit) = audit {
            state.audit.push(audit.clone());
        }
        Ok(())
    }

    async fn update(
        &self,
        report: &Report,
        expected: ReportStatus,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        let stored = state
            .reports
            .get(&report.id)
            .ok_or(DomainError::ReportNotFound(report.id))?;
        if stored.status != expected {
            return Err(DomainError::invalid_transition("report", expected, report.status));
        }
        state.reports.insert(report.id, report.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn escalate(&self, parent: &Report, child: &Report, audit: &AuditEntry) -> RepoResult<()> {
        let mut state = self.state.lock();
        let now = child.created_at;
        let stored = state
            .reports
            .get_mut(&parent.id)
            .ok_or(DomainError::ReportNotFound(parent.id))?;
        if stored.status != ReportStatus::Approved || stored.escalated_at.is_some() {
            return Err(DomainError::AlreadyEscalated(parent.id));
        }
        stored.status = ReportStatus::Escalated;
        stored.escalation_pending = false;
        stored.escalated_at = Some(parent.escalated_at.unwrap_or(now));

        state.reports.insert(child.id, child.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn mark_escalation_pending(&self, report_id: Snowflake, audit: &AuditEntry) -> RepoResult<()> {
        let mut state = self.state.lock();
        let stored = state
            .reports
            .get_mut(&report_id)
            .ok_or(DomainError::ReportNotFound(report_id))?;
        if stored.status != ReportStatus::Approved || stored.escalated_at.is_some() {
            return Err(DomainError::AlreadyEscalated(report_id));
        }
        stored.escalation_pending = true;
        state.audit.push(audit.clone());
        Ok(())
    }
}

// ============================================================================
// Content
// ============================================================================

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ContentItem>> {
        Ok(self.state.lock().content.get(&id).cloned())
    }

    async fn list_by_state(&self, publish_state: PublishState) -> RepoResult<Vec<ContentItem>> {
        let state = self.state.lock();
        let mut items: Vec<ContentItem> = state
            .content
            .values()
            .filter(|c| c.publish_state == publish_state)
            .cloned()
            .collect();
        newest_first(&mut items, |c| (c.created_at, c.id));
        Ok(items)
    }

    async fn list_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<ContentItem>> {
        let state = self.state.lock();
        let mut items: Vec<ContentItem> = state
            .content
            .values()
            .filter(|c| c.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut items, |c| (c.created_at, c.id));
        Ok(items)
    }

    async fn create(&self, item: &ContentItem, audit: &AuditEntry) -> RepoResult<()> {
        let mut state = self.state.lock();
        state.content.insert(item.id, item.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn update(
        &self,
        item: &ContentItem,
        expected: PublishState,
        audit: Option<&AuditEntry>,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        let stored = state
            .content
            .get(&item.id)
            .ok_or(DomainError::ContentNotFound(item.id))?;
        if stored.publish_state != expected {
            return Err(DomainError::invalid_transition(
                "content",
                expected,
                item.publish_state,
            ));
        }
        state.content.insert(item.id, item.clone());
        if let Some(audit) = audit {
            state.audit.push(audit.clone());
        }
        Ok(())
    }
}

// ============================================================================
// Audit
// ============================================================================

#[async_trait]
impl AuditRepository for MemoryStore {
    async fn append(&self, entry: &AuditEntry) -> RepoResult<()> {
        self.state.lock().audit.push(entry.clone());
        Ok(())
    }

    async fn list_for_member(
        &self,
        member_id: Snowflake,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<AuditEntry>> {
        let state = self.state.lock();
        let mut entries: Vec<AuditEntry> = state
            .audit
            .iter()
            .filter(|e| {
                e.created_at >= since
                    && (e.target_member_id == member_id || e.performed_by_id == Some(member_id))
            })
            .cloned()
            .collect();
        oldest_first(&mut entries, |e| (e.created_at, e.id));
        Ok(entries)
    }

    async fn list_by_target(&self, member_id: Snowflake, limit: i64) -> RepoResult<Vec<AuditEntry>> {
        let limit = usize::try_from(limit.clamp(1, 1000)).unwrap_or(1000);
        let state = self.state.lock();
        let mut entries: Vec<AuditEntry> = state
            .audit
            .iter()
            .filter(|e| e.target_member_id == member_id)
            .cloned()
            .collect();
        newest_first(&mut entries, |e| (e.created_at, e.id));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpn_core::entities::AuditKind;
    use kpn_core::value_objects::{DisciplinaryType, ReviewOutcome, Tier, TierPath};
    use kpn_core::ReportDraft;

    const SEAT: Snowflake = Snowflake::new(1_000_034);
    const WARD: Snowflake = Snowflake::new(40);

    fn audit(id: i64, target: Snowflake) -> AuditEntry {
        AuditEntry::new(Snowflake::new(id), AuditKind::MemberApproved, None, target)
    }

    async fn pending_ward_member(store: &MemoryStore, id: i64) -> Member {
        let member = Member::new(Snowflake::new(id), format!("Member {id}"), Tier::Ward, Some(WARD))
            .with_seat(SEAT);
        MemberRepository::create(store, &member, &audit(id * 100, member.id))
            .await
            .unwrap();
        member
    }

    fn approve(id: Snowflake) -> StatusChange {
        StatusChange::new(id, ApprovalStatus::Approved).from_status(ApprovalStatus::Pending)
    }

    #[tokio::test]
    async fn test_second_approval_on_same_key_is_rejected() {
        let store = MemoryStore::new();
        let first = pending_ward_member(&store, 1).await;
        let second = pending_ward_member(&store, 2).await;

        store.set_status(&approve(first.id), &audit(10, first.id)).await.unwrap();
        let err = store
            .set_status(&approve(second.id), &audit(11, second.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SeatOccupied { .. }));

        let holder = store.find_seat_holder(SEAT, Some(WARD)).await.unwrap().unwrap();
        assert_eq!(holder.id, first.id);
        // The failed approval left no audit trail
        assert!(AuditRepository::list_by_target(&store, second.id, 10)
            .await
            .unwrap()
            .iter()
            .all(|e| e.id != Snowflake::new(11)));
    }

    #[tokio::test]
    async fn test_concurrent_approvals_have_one_winner() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for id in 1..=8 {
            ids.push(pending_ward_member(&store, id).await.id);
        }

        let mut handles = Vec::new();
        for (n, id) in ids.into_iter().enumerate() {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let n = i64::try_from(n).unwrap();
                store.set_status(&approve(id), &audit(500 + n, id)).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_status_guard() {
        let store = MemoryStore::new();
        let member = pending_ward_member(&store, 1).await;
        store.set_status(&approve(member.id), &audit(10, member.id)).await.unwrap();

        let err = store
            .set_status(&approve(member.id), &audit(11, member.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyResolved(_)));
    }

    #[tokio::test]
    async fn test_swap_positions() {
        let store = MemoryStore::new();
        let a = pending_ward_member(&store, 1).await;
        store.set_status(&approve(a.id), &audit(10, a.id)).await.unwrap();

        let b = approved_lga_member(&store, 2).await;

        let (new_a, new_b) = store
            .swap_positions(a.id, b.id, [&audit(30, a.id), &audit(31, b.id)])
            .await
            .unwrap();
        assert_eq!(new_a.role_tier, Tier::Lga);
        assert_eq!(new_a.seat_id, Some(Snowflake::new(1_000_024)));
        assert_eq!(new_b.role_tier, Tier::Ward);
        assert_eq!(new_b.jurisdiction_id, Some(WARD));
    }

    async fn approved_lga_member(store: &MemoryStore, id: i64) -> Member {
        let member = Member::new(Snowflake::new(id), format!("Member {id}"), Tier::Lga, Some(Snowflake::new(30)))
            .with_seat(Snowflake::new(1_000_024));
        MemberRepository::create(store, &member, &audit(id * 100, member.id)).await.unwrap();
        store.set_status(&approve(member.id), &audit(id * 100 + 1, member.id)).await.unwrap()
    }

    fn dismiss(id: Snowflake) -> StatusChange {
        StatusChange::new(id, ApprovalStatus::Dismissed)
    }

    #[tokio::test]
    async fn test_place_refuses_member_dismissed_meanwhile() {
        let store = MemoryStore::new();
        let member = pending_ward_member(&store, 1).await;
        store.set_status(&approve(member.id), &audit(10, member.id)).await.unwrap();
        store.set_status(&dismiss(member.id), &audit(11, member.id)).await.unwrap();

        // Placement planned while the member was still APPROVED
        let target = Placement::seated(Tier::Lga, Snowflake::new(1_000_024), Some(Snowflake::new(30)));
        let err = store
            .place(member.id, ApprovalStatus::Approved, &target, &audit(12, member.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let stored = MemberRepository::find_by_id(&store, member.id).await.unwrap().unwrap();
        assert_eq!(stored.approval_status, ApprovalStatus::Dismissed);
        assert!(stored.seat_id.is_none());
        assert!(AuditRepository::list_by_target(&store, member.id, 10)
            .await
            .unwrap()
            .iter()
            .all(|e| e.id != Snowflake::new(12)));
    }

    #[tokio::test]
    async fn test_swap_refuses_dismissed_member() {
        let store = MemoryStore::new();
        let a = pending_ward_member(&store, 1).await;
        store.set_status(&approve(a.id), &audit(10, a.id)).await.unwrap();
        let b = approved_lga_member(&store, 2).await;
        store.set_status(&dismiss(a.id), &audit(11, a.id)).await.unwrap();

        let err = store
            .swap_positions(a.id, b.id, [&audit(30, a.id), &audit(31, b.id)])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let stored_a = MemberRepository::find_by_id(&store, a.id).await.unwrap().unwrap();
        let stored_b = MemberRepository::find_by_id(&store, b.id).await.unwrap().unwrap();
        assert!(stored_a.seat_id.is_none());
        assert_eq!(stored_b.placement(), b.placement());
        assert_eq!(stored_b.approval_status, ApprovalStatus::Approved);
    }

    #[tokio::test]
    async fn test_concurrent_placements_have_one_winner() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for id in 1..=8 {
            let member = Member::new(Snowflake::new(id), format!("Member {id}"), Tier::Ward, Some(WARD));
            MemberRepository::create(&store, &member, &audit(id * 100, member.id)).await.unwrap();
            store.set_status(&approve(member.id), &audit(id * 100 + 1, member.id)).await.unwrap();
            ids.push(member.id);
        }

        let target = Placement::seated(Tier::Ward, SEAT, Some(WARD));
        let mut handles = Vec::new();
        for (n, id) in ids.into_iter().enumerate() {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let n = i64::try_from(n).unwrap();
                store.place(id, ApprovalStatus::Approved, &target, &audit(900 + n, id)).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert!(matches!(e, DomainError::SeatOccupied { .. }), "{e}"),
            }
        }
        assert_eq!(winners, 1);
        assert!(store.find_seat_holder(SEAT, Some(WARD)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_decide_is_compare_and_swap() {
        let store = MemoryStore::new();
        let target = pending_ward_member(&store, 1).await;
        store.set_status(&approve(target.id), &audit(10, target.id)).await.unwrap();

        let action = DisciplinaryAction::issue(
            Snowflake::new(50),
            target.id,
            Snowflake::new(9),
            DisciplinaryType::Dismissal,
            "absent",
            false,
        );
        DisciplinaryRepository::create(&store, &action, None, &audit(51, target.id))
            .await
            .unwrap();
        assert_eq!(store.list_pending().await.unwrap().len(), 1);

        let mut approved = action.clone();
        approved.approve(Snowflake::new(8), None).unwrap();
        let dismiss = StatusChange::new(target.id, ApprovalStatus::Dismissed);
        store.decide(&approved, Some(&dismiss), &audit(52, target.id)).await.unwrap();

        let mut rejected = action.clone();
        rejected.reject(Snowflake::new(7), None).unwrap();
        let err = store.decide(&rejected, None, &audit(53, target.id)).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyResolved(_)));

        let member = MemberRepository::find_by_id(&store, target.id).await.unwrap().unwrap();
        assert_eq!(member.approval_status, ApprovalStatus::Dismissed);
        assert!(member.seat_id.is_none());
        assert!(store.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guarded_effect_is_skipped() {
        let store = MemoryStore::new();
        let target = pending_ward_member(&store, 1).await;

        // Member is still PENDING, so an APPROVED-guarded suspension does nothing
        let action = DisciplinaryAction::issue(
            Snowflake::new(50),
            target.id,
            Snowflake::new(9),
            DisciplinaryType::Suspension,
            "late dues",
            false,
        );
        let effect = StatusChange::new(target.id, ApprovalStatus::Suspended)
            .from_status(ApprovalStatus::Approved);
        DisciplinaryRepository::create(&store, &action, Some(&effect), &audit(51, target.id))
            .await
            .unwrap();

        let member = MemberRepository::find_by_id(&store, target.id).await.unwrap().unwrap();
        assert_eq!(member.approval_status, ApprovalStatus::Pending);
        assert!(DisciplinaryRepository::find_by_id(&store, action.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_escalate_once() {
        let store = MemoryStore::new();
        let mut report = Report::draft(
            Snowflake::new(1),
            Snowflake::new(10),
            WARD,
            ReportDraft {
                tier_path: TierPath::WardToLga,
                title: "April".into(),
                content: "Door to door canvassing".into(),
                period: "2026-04".into(),
                deadline: None,
            },
        );
        ReportRepository::create(&store, &report, None).await.unwrap();

        report.submit(Snowflake::new(20)).unwrap();
        ReportRepository::update(&store, &report, ReportStatus::Draft, &audit(2, report.submitted_by_id))
            .await
            .unwrap();
        report.review(Snowflake::new(20), ReviewOutcome::Approved, None).unwrap();
        ReportRepository::update(&store, &report, ReportStatus::Submitted, &audit(3, report.submitted_by_id))
            .await
            .unwrap();

        let child = report
            .escalated_child(Snowflake::new(5), Snowflake::new(20), Snowflake::new(30), "From ward")
            .unwrap();
        store.escalate(&report, &child, &audit(4, report.submitted_by_id)).await.unwrap();

        let again = report
            .escalated_child(Snowflake::new(6), Snowflake::new(20), Snowflake::new(30), "From ward")
            .unwrap();
        let err = store
            .escalate(&report, &again, &audit(5, report.submitted_by_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyEscalated(_)));
        assert_eq!(store.find_children(report.id).await.unwrap().len(), 1);

        let stored = ReportRepository::find_by_id(&store, report.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReportStatus::Escalated);
    }

    #[tokio::test]
    async fn test_report_update_loses_race() {
        let store = MemoryStore::new();
        let mut report = Report::draft(
            Snowflake::new(1),
            Snowflake::new(10),
            WARD,
            ReportDraft {
                tier_path: TierPath::WardToLga,
                title: "May".into(),
                content: "Rally".into(),
                period: "2026-05".into(),
                deadline: None,
            },
        );
        ReportRepository::create(&store, &report, None).await.unwrap();
        report.submit(Snowflake::new(20)).unwrap();

        let err = ReportRepository::update(&store, &report, ReportStatus::Submitted, &audit(2, report.submitted_by_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_audit_ordering() {
        let store = MemoryStore::new();
        let target = Snowflake::new(1);
        let base = Utc::now();
        for n in 0..3 {
            let entry = audit(n + 1, target).at(base + chrono::Duration::seconds(n));
            store.append(&entry).await.unwrap();
        }

        let newest = AuditRepository::list_by_target(&store, target, 2).await.unwrap();
        assert_eq!(newest.len(), 2);
        assert_eq!(newest[0].id, Snowflake::new(3));

        let window = store
            .list_for_member(target, base + chrono::Duration::seconds(1))
            .await
            .unwrap();
        let ids: Vec<i64> = window.iter().map(|e| e.id.into_inner()).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
