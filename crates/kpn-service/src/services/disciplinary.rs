//! Disciplinary workflow
//!
//! Issuance, dismissal approval and resolution. Who may approve a dismissal
//! comes from the resolver; the decision itself is a compare-and-set in
//! storage, so two approvers racing each other produce one outcome.

use chrono::Utc;
use tracing::{info, instrument};

use kpn_core::events::{DisciplinaryIssuedEvent, DisciplinaryResolvedEvent, DismissalDecidedEvent};
use kpn_core::governance::{approval_route, can_approve, can_discipline, capabilities_for, require};
use kpn_core::{
    ApprovalStatus, AuditKind, Capabilities, DisciplinaryAction, DisciplinaryType, DomainError,
    DomainEvent, Member, Snowflake, StatusChange,
};

use crate::dto::{
    ApproverRouteResponse, DecisionRequest, DisciplinaryActionResponse, RejectRequest,
    SubmitDisciplinaryRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Disciplinary service
pub struct DisciplinaryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DisciplinaryService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Raise an action against a member
    ///
    /// Suspensions take effect at once. A dismissal from the top seat is
    /// final immediately; any other dismissal waits for an approver.
    #[instrument(skip(self, request), fields(action_type = %request.action_type))]
    pub async fn submit(
        &self,
        issuer_id: Snowflake,
        request: SubmitDisciplinaryRequest,
    ) -> ServiceResult<DisciplinaryActionResponse> {
        let (_, issuer) = self.ctx.acting(issuer_id).await?;
        require(&issuer, Capabilities::ISSUE_DISCIPLINE, "issue disciplinary actions")?;

        let target = self.ctx.member(request.target_member_id).await?;
        if !target.approval_status.occupies_seat() {
            return Err(DomainError::invalid_transition(
                "member",
                target.approval_status,
                request.action_type,
            )
            .into());
        }
        let catalog = self.ctx.catalog();
        can_discipline(&catalog.tree, &issuer, &self.ctx.rank_of(&target), request.action_type)?;

        let action = DisciplinaryAction::issue(
            self.ctx.generate_id(),
            target.id,
            issuer_id,
            request.action_type,
            request.reason.trim(),
            issuer.is_top(),
        );

        let (kind, effect) = match request.action_type {
            DisciplinaryType::Suspension => (
                AuditKind::Suspension,
                Some(StatusChange::new(target.id, ApprovalStatus::Suspended).from_status(ApprovalStatus::Approved)),
            ),
            DisciplinaryType::Dismissal if !action.awaits_approval() => (
                AuditKind::Dismissal,
                Some(StatusChange::new(target.id, ApprovalStatus::Dismissed)),
            ),
            _ => (AuditKind::DisciplinaryIssued, None),
        };
        let audit = self
            .effect_audit(kind, issuer_id, &target, effect.as_ref())
            .with_reason(Some(action.reason.clone()));

        self.ctx
            .disciplinary_repo()
            .create(&action, effect.as_ref(), &audit)
            .await?;

        let route = action
            .awaits_approval()
            .then(|| approval_route(&catalog.tree, &issuer))
            .flatten();

        info!(
            action_id = %action.id,
            target = %target.id,
            pending = action.awaits_approval(),
            "Disciplinary action issued"
        );

        self.ctx
            .notify(DomainEvent::DisciplinaryIssued(DisciplinaryIssuedEvent {
                action_id: action.id,
                target_member_id: target.id,
                issuer_member_id: issuer_id,
                action_type: action.action_type,
                required_approver: route.map(|r| r.rung),
                timestamp: Utc::now(),
            }))
            .await;

        let mut response = DisciplinaryActionResponse::from(&action);
        response.required_approver = route.map(ApproverRouteResponse::from);
        Ok(response)
    }

    /// Approve a pending dismissal; the target is dismissed and unseated
    #[instrument(skip(self, request))]
    pub async fn approve(
        &self,
        approver_id: Snowflake,
        action_id: Snowflake,
        request: DecisionRequest,
    ) -> ServiceResult<DisciplinaryActionResponse> {
        let mut action = self.decidable(approver_id, action_id).await?;
        action.approve(approver_id, request.notes)?;

        let target = self.ctx.member(action.target_member_id).await?;
        let effect = StatusChange::new(target.id, ApprovalStatus::Dismissed);
        let audit = self
            .effect_audit(AuditKind::Dismissal, approver_id, &target, Some(&effect))
            .with_reason(Some(action.reason.clone()));

        self.ctx
            .disciplinary_repo()
            .decide(&action, Some(&effect), &audit)
            .await?;

        info!(action_id = %action_id, approver = %approver_id, "Dismissal approved");
        self.notify_decision(&action, approver_id, true).await;

        Ok(DisciplinaryActionResponse::from(&action))
    }

    /// Turn down a pending dismissal; the target is unaffected
    #[instrument(skip(self, request))]
    pub async fn reject(
        &self,
        approver_id: Snowflake,
        action_id: Snowflake,
        request: RejectRequest,
    ) -> ServiceResult<DisciplinaryActionResponse> {
        let mut action = self.decidable(approver_id, action_id).await?;
        action.reject(approver_id, Some(request.reason.clone()))?;

        let audit = self
            .ctx
            .audit(AuditKind::DismissalRejected, Some(approver_id), action.target_member_id)
            .with_reason(Some(request.reason));

        self.ctx.disciplinary_repo().decide(&action, None, &audit).await?;

        info!(action_id = %action_id, approver = %approver_id, "Dismissal rejected");
        self.notify_decision(&action, approver_id, false).await;

        Ok(DisciplinaryActionResponse::from(&action))
    }

    /// Close a warning, reprimand or suspension
    ///
    /// Allowed for the issuer, state executives and the top seat. Resolving
    /// a suspension reinstates a still-suspended target.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        actor_id: Snowflake,
        action_id: Snowflake,
    ) -> ServiceResult<DisciplinaryActionResponse> {
        let mut action = self.find(action_id).await?;
        let (_, actor) = self.ctx.acting(actor_id).await?;

        let may_resolve = actor.is_top()
            || actor_id == action.issuer_member_id
            || capabilities_for(actor.rung).has(Capabilities::RESOLVE_DISCIPLINE);
        if !may_resolve {
            return Err(DomainError::PermissionDenied(
                "only the issuer, a state executive or the top seat may resolve this action".into(),
            )
            .into());
        }
        action.resolve()?;

        let target = self.ctx.member(action.target_member_id).await?;
        let effect = (action.action_type == DisciplinaryType::Suspension).then(|| {
            StatusChange::new(target.id, ApprovalStatus::Approved).from_status(ApprovalStatus::Suspended)
        });
        let audit = self.effect_audit(AuditKind::DisciplinaryResolved, actor_id, &target, effect.as_ref());

        self.ctx
            .disciplinary_repo()
            .resolve(&action, effect.as_ref(), &audit)
            .await?;

        info!(action_id = %action_id, resolved_by = %actor_id, "Disciplinary action resolved");

        self.ctx
            .notify(DomainEvent::DisciplinaryResolved(DisciplinaryResolvedEvent {
                action_id,
                target_member_id: target.id,
                resolved_by: actor_id,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(DisciplinaryActionResponse::from(&action))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, action_id: Snowflake) -> ServiceResult<DisciplinaryActionResponse> {
        let action = self.find(action_id).await?;
        self.describe(&action).await
    }

    /// Actions against a member, newest first
    #[instrument(skip(self))]
    pub async fn list_for_member(&self, member_id: Snowflake) -> ServiceResult<Vec<DisciplinaryActionResponse>> {
        self.ctx.member(member_id).await?;
        let actions = self.ctx.disciplinary_repo().list_by_target(member_id).await?;
        Ok(actions.iter().map(DisciplinaryActionResponse::from).collect())
    }

    /// Pending dismissals the viewer is entitled to decide, oldest first
    #[instrument(skip(self))]
    pub async fn list_pending(&self, viewer_id: Snowflake) -> ServiceResult<Vec<DisciplinaryActionResponse>> {
        let (_, viewer) = self.ctx.acting(viewer_id).await?;
        let tree = &self.ctx.catalog().tree;

        let mut visible = Vec::new();
        for action in self.ctx.disciplinary_repo().list_pending().await? {
            if action.target_member_id == viewer_id {
                continue;
            }
            let issuer = self.issuer_position(&action).await?;
            if can_approve(tree, &viewer, &issuer) {
                visible.push(self.describe(&action).await?);
            }
        }
        Ok(visible)
    }

    async fn find(&self, action_id: Snowflake) -> ServiceResult<DisciplinaryAction> {
        self.ctx
            .disciplinary_repo()
            .find_by_id(action_id)
            .await?
            .ok_or_else(|| DomainError::ActionNotFound(action_id).into())
    }

    /// Load a pending dismissal and check the approver against the resolver
    async fn decidable(&self, approver_id: Snowflake, action_id: Snowflake) -> ServiceResult<DisciplinaryAction> {
        let action = self.find(action_id).await?;
        if !action.awaits_approval() {
            return Err(DomainError::AlreadyResolved(action_id).into());
        }
        if approver_id == action.target_member_id {
            return Err(DomainError::SelfTarget.into());
        }

        let (_, approver) = self.ctx.acting(approver_id).await?;
        let issuer = self.issuer_position(&action).await?;
        if !can_approve(&self.ctx.catalog().tree, &approver, &issuer) {
            return Err(DomainError::UnauthorizedApprover(approver_id).into());
        }
        Ok(action)
    }

    async fn issuer_position(&self, action: &DisciplinaryAction) -> ServiceResult<kpn_core::governance::Position> {
        let issuer = self.ctx.member(action.issuer_member_id).await?;
        Ok(self.ctx.rank_of(&issuer))
    }

    /// Response with the approver route filled in for pending dismissals
    async fn describe(&self, action: &DisciplinaryAction) -> ServiceResult<DisciplinaryActionResponse> {
        let mut response = DisciplinaryActionResponse::from(action);
        if action.awaits_approval() {
            let issuer = self.issuer_position(action).await?;
            response.required_approver =
                approval_route(&self.ctx.catalog().tree, &issuer).map(ApproverRouteResponse::from);
        }
        Ok(response)
    }

    /// Audit entry imaging the target before and after `effect`
    fn effect_audit(
        &self,
        kind: AuditKind,
        actor_id: Snowflake,
        target: &Member,
        effect: Option<&StatusChange>,
    ) -> kpn_core::AuditEntry {
        let mut after = target.clone();
        if let Some(change) = effect {
            if change.expected.map_or(true, |expected| expected == target.approval_status) {
                after.set_status(change.status);
            }
        }
        self.ctx
            .audit_change(kind, actor_id, target.id, &target.snapshot(), &after.snapshot())
    }

    async fn notify_decision(&self, action: &DisciplinaryAction, approver_id: Snowflake, approved: bool) {
        self.ctx
            .notify(DomainEvent::DismissalDecided(DismissalDecidedEvent {
                action_id: action.id,
                target_member_id: action.target_member_id,
                issuer_member_id: action.issuer_member_id,
                approver_member_id: approver_id,
                approved,
                timestamp: Utc::now(),
            }))
            .await;
    }
}
