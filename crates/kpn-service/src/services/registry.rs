//! Member registry
//!
//! Registration, admission decisions and direct seat management. Seat
//! occupancy is enforced by storage; this layer only checks that a binding
//! makes sense and that the actor may make it.

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument};

use kpn_core::events::{MemberDecidedEvent, MemberRegisteredEvent, PositionChangedEvent};
use kpn_core::governance::{can_approve_member, require, Position};
use kpn_core::{
    ApprovalStatus, AuditKind, Capabilities, DomainError, DomainEvent, Level, Member, Placement,
    Snowflake, StatusChange,
};

use crate::dto::{
    AssignSeatRequest, DecisionRequest, MemberResponse, MemberView, RegisterMemberRequest,
    RejectRequest, VacateSeatRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Member registry service
pub struct RegistryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RegistryService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn view(&self, member: &Member) -> MemberResponse {
        MemberResponse::from(MemberView::new(member, self.ctx.catalog()))
    }

    /// File a PENDING membership application
    #[instrument(skip(self, request), fields(tier = %request.role_tier))]
    pub async fn register(&self, request: RegisterMemberRequest) -> ServiceResult<MemberResponse> {
        let catalog = self.ctx.catalog();
        let tier = request.role_tier;

        if tier.is_leadership() {
            let seat_id = request.seat_id.ok_or_else(|| {
                DomainError::ValidationError(format!("a {tier} application must name a seat"))
            })?;
            catalog.validate_binding(tier, seat_id, request.jurisdiction_id)?;
        } else {
            if let Some(seat_id) = request.seat_id {
                // Always a mismatch; reported with the seat's real tier
                catalog.validate_binding(tier, seat_id, request.jurisdiction_id)?;
            }
            let home = request.jurisdiction_id.ok_or(DomainError::JurisdictionRequired {
                tier,
                level: Level::Ward,
            })?;
            if catalog.tree.get(home)?.level != Level::Ward {
                return Err(DomainError::JurisdictionRequired {
                    tier,
                    level: Level::Ward,
                }
                .into());
            }
        }

        let mut member = Member::new(
            self.ctx.generate_id(),
            request.full_name.trim(),
            tier,
            request.jurisdiction_id,
        );
        if let Some(seat_id) = request.seat_id {
            member = member.with_seat(seat_id);
        }

        let audit = self.ctx.audit_change(
            AuditKind::MemberRegistered,
            member.id,
            member.id,
            &Value::Null,
            &member.snapshot(),
        );
        self.ctx.member_repo().create(&member, &audit).await?;

        info!(member_id = %member.id, tier = %tier, "Member registered");

        self.ctx
            .notify(DomainEvent::MemberRegistered(MemberRegisteredEvent {
                member_id: member.id,
                role_tier: tier,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(self.view(&member))
    }

    /// Admit a pending applicant
    ///
    /// Approval takes the requested seat; a seat that was filled in the
    /// meantime fails with `SeatOccupied` and leaves the application pending.
    #[instrument(skip(self, request))]
    pub async fn approve(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: DecisionRequest,
    ) -> ServiceResult<MemberResponse> {
        let (_, position) = self.ctx.acting(actor_id).await?;
        let applicant = self.admissible(&position, member_id).await?;

        let mut after = applicant.clone();
        after.set_status(ApprovalStatus::Approved);
        let audit = self
            .ctx
            .audit_change(
                AuditKind::MemberApproved,
                actor_id,
                member_id,
                &applicant.snapshot(),
                &after.snapshot(),
            )
            .with_reason(request.notes);

        let change = StatusChange::new(member_id, ApprovalStatus::Approved).from_status(ApprovalStatus::Pending);
        let member = self.ctx.member_repo().set_status(&change, &audit).await?;

        info!(member_id = %member_id, approved_by = %actor_id, "Member approved");
        self.notify_decision(member_id, actor_id, true).await;

        Ok(self.view(&member))
    }

    /// Turn down a pending applicant; the requested seat is released
    #[instrument(skip(self, request))]
    pub async fn reject(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: RejectRequest,
    ) -> ServiceResult<MemberResponse> {
        let (_, position) = self.ctx.acting(actor_id).await?;
        let applicant = self.admissible(&position, member_id).await?;

        let mut after = applicant.clone();
        after.set_status(ApprovalStatus::Rejected);
        let audit = self
            .ctx
            .audit_change(
                AuditKind::MemberRejected,
                actor_id,
                member_id,
                &applicant.snapshot(),
                &after.snapshot(),
            )
            .with_reason(Some(request.reason));

        let change = StatusChange::new(member_id, ApprovalStatus::Rejected).from_status(ApprovalStatus::Pending);
        let member = self.ctx.member_repo().set_status(&change, &audit).await?;

        info!(member_id = %member_id, rejected_by = %actor_id, "Member rejected");
        self.notify_decision(member_id, actor_id, false).await;

        Ok(self.view(&member))
    }

    /// Bind a member to a seat, releasing the old one in the same write
    #[instrument(skip(self, request))]
    pub async fn assign_seat(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: AssignSeatRequest,
    ) -> ServiceResult<MemberResponse> {
        let (_, position) = self.ctx.acting(actor_id).await?;
        require(&position, Capabilities::MANAGE_POSITIONS, "assign seats")?;
        if actor_id == member_id {
            return Err(DomainError::SelfTarget.into());
        }

        let member = self.ctx.member(member_id).await?;
        if member.approval_status.is_terminal_negative() {
            return Err(DomainError::invalid_transition("member", member.approval_status, "SEATED").into());
        }

        let tier = request.role_tier.unwrap_or(member.role_tier);
        let seat = self
            .ctx
            .catalog()
            .validate_binding(tier, request.seat_id, request.jurisdiction_id)?;
        let placement = Placement::seated(tier, seat.id, request.jurisdiction_id);
        if member.placement() == placement {
            return Ok(self.view(&member));
        }

        let audit = self.ctx.audit_change(
            AuditKind::SeatAssigned,
            actor_id,
            member_id,
            &member.placement(),
            &placement,
        );
        let updated = self
            .ctx
            .member_repo()
            .place(member_id, member.approval_status, &placement, &audit)
            .await?;

        info!(member_id = %member_id, seat_id = %seat.id, "Seat assigned");
        self.notify_position(&member, &updated, actor_id).await;

        Ok(self.view(&updated))
    }

    /// Clear a member's seat and jurisdiction; approval status is kept
    ///
    /// Vacating an already unseated member is a no-op.
    #[instrument(skip(self, request))]
    pub async fn vacate(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: VacateSeatRequest,
    ) -> ServiceResult<MemberResponse> {
        let (_, position) = self.ctx.acting(actor_id).await?;
        require(&position, Capabilities::MANAGE_POSITIONS, "vacate seats")?;

        let member = self.ctx.member(member_id).await?;
        if self.ctx.catalog().is_protected(&member) {
            return Err(DomainError::ProtectedRole(member_id).into());
        }
        if member.seat_id.is_none() && member.jurisdiction_id.is_none() {
            return Ok(self.view(&member));
        }

        let placement = Placement::unseated(member.role_tier);
        let audit = self
            .ctx
            .audit_change(
                AuditKind::SeatVacated,
                actor_id,
                member_id,
                &member.placement(),
                &placement,
            )
            .with_reason(request.reason);
        let updated = self
            .ctx
            .member_repo()
            .place(member_id, member.approval_status, &placement, &audit)
            .await?;

        info!(member_id = %member_id, "Seat vacated");
        self.notify_position(&member, &updated, actor_id).await;

        Ok(self.view(&updated))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, member_id: Snowflake) -> ServiceResult<MemberResponse> {
        let member = self.ctx.member(member_id).await?;
        Ok(self.view(&member))
    }

    /// Members bound to a jurisdiction node
    #[instrument(skip(self))]
    pub async fn list_by_jurisdiction(&self, jurisdiction_id: Snowflake) -> ServiceResult<Vec<MemberResponse>> {
        self.ctx.catalog().tree.get(jurisdiction_id)?;
        let members = self.ctx.member_repo().list_by_jurisdiction(jurisdiction_id).await?;
        Ok(members.iter().map(|m| self.view(m)).collect())
    }

    /// Pending applications the actor may decide, oldest first
    #[instrument(skip(self))]
    pub async fn list_pending(&self, actor_id: Snowflake) -> ServiceResult<Vec<MemberResponse>> {
        let (_, position) = self.ctx.acting(actor_id).await?;
        let tree = &self.ctx.catalog().tree;
        let pending = self.ctx.member_repo().list_by_status(ApprovalStatus::Pending).await?;
        Ok(pending
            .iter()
            .filter(|m| m.id != actor_id && can_approve_member(tree, &position, m.role_tier, m.jurisdiction_id))
            .map(|m| self.view(m))
            .collect())
    }

    /// Load an applicant the actor is allowed to decide on
    async fn admissible(&self, position: &Position, member_id: Snowflake) -> ServiceResult<Member> {
        require(position, Capabilities::APPROVE_MEMBERS, "approve members")?;
        if position.member_id == member_id {
            return Err(DomainError::SelfTarget.into());
        }

        let applicant = self.ctx.member(member_id).await?;
        let tree = &self.ctx.catalog().tree;
        if !can_approve_member(tree, position, applicant.role_tier, applicant.jurisdiction_id) {
            return Err(DomainError::UnauthorizedApprover(position.member_id).into());
        }
        Ok(applicant)
    }

    async fn notify_decision(&self, member_id: Snowflake, decided_by: Snowflake, approved: bool) {
        self.ctx
            .notify(DomainEvent::MemberDecided(MemberDecidedEvent {
                member_id,
                decided_by,
                approved,
                timestamp: Utc::now(),
            }))
            .await;
    }

    async fn notify_position(&self, before: &Member, after: &Member, changed_by: Snowflake) {
        self.ctx
            .notify(DomainEvent::PositionChanged(PositionChangedEvent {
                member_id: after.id,
                changed_by,
                from_tier: before.role_tier,
                to_tier: after.role_tier,
                seat_id: after.seat_id,
                timestamp: Utc::now(),
            }))
            .await;
    }
}
