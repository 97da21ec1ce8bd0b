//! Duty tracking and standing recomputation
//!
//! Standing is never written directly. Duty events are appended to the
//! audit log and the member's standing is refolded from the log window.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use kpn_core::events::StandingChangedEvent;
use kpn_core::governance::{can_discipline, fold_standing, recompute_standing, require, standing};
use kpn_core::{
    ApprovalStatus, AuditKind, Capabilities, DisciplinaryType, DomainError, DomainEvent, Snowflake,
    Standing,
};

use crate::dto::{AuditEntryResponse, DutyEventRequest, StandingResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 500;

/// Totals from a standing sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub total_checked: usize,
    pub flagged_inactive: usize,
    pub flagged_irregular: usize,
    pub errors: usize,
}

/// Standing service
pub struct StandingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StandingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request))]
    pub async fn record_missed_duty(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: DutyEventRequest,
    ) -> ServiceResult<StandingResponse> {
        self.record(actor_id, member_id, AuditKind::DutyMissed, request.reason).await
    }

    #[instrument(skip(self, request))]
    pub async fn record_ignored_reminder(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: DutyEventRequest,
    ) -> ServiceResult<StandingResponse> {
        self.record(actor_id, member_id, AuditKind::ReminderIgnored, request.reason).await
    }

    /// Zero the duty counters from this point in the log onward
    #[instrument(skip(self, request))]
    pub async fn reset_counters(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: DutyEventRequest,
    ) -> ServiceResult<StandingResponse> {
        self.record(actor_id, member_id, AuditKind::CountersReset, request.reason).await
    }

    /// Note that a member was active; members may record their own activity
    #[instrument(skip(self, request))]
    pub async fn record_activity(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: DutyEventRequest,
    ) -> ServiceResult<StandingResponse> {
        if actor_id != member_id {
            self.supervises(actor_id, member_id).await?;
        } else {
            self.ctx.member(member_id).await?;
        }
        self.append(actor_id, member_id, AuditKind::ActivityRecorded, request.reason)
            .await?;
        self.recompute(member_id).await
    }

    /// Refold a member's standing as of now
    pub async fn recompute(&self, member_id: Snowflake) -> ServiceResult<StandingResponse> {
        self.recompute_at(member_id, Utc::now()).await
    }

    /// Refold a member's standing as of `now`
    ///
    /// A change of classification is written with an auto-generated audit
    /// entry; an unchanged one only refreshes the stored inputs.
    #[instrument(skip(self))]
    pub async fn recompute_at(&self, member_id: Snowflake, now: DateTime<Utc>) -> ServiceResult<StandingResponse> {
        let member = self.ctx.member(member_id).await?;
        let window_days = self.ctx.governance().standing_window_days;

        let entries = self
            .ctx
            .audit_repo()
            .list_for_member(member_id, standing::window_start(window_days, now))
            .await?;
        let inputs = fold_standing(&member, &entries, window_days, now);
        let next = recompute_standing(&inputs, now);
        let previous = member.computed_standing;
        let changed = next != previous;

        let audit = changed.then(|| {
            self.ctx
                .audit(AuditKind::StandingChanged, None, member_id)
                .with_change(&previous, &next)
                .auto_generated()
                .at(now)
        });
        self.ctx
            .member_repo()
            .update_standing(member_id, &inputs, next, audit.as_ref())
            .await?;

        if changed {
            info!(member_id = %member_id, from = %previous, to = %next, "Standing changed");
            self.ctx
                .notify(DomainEvent::StandingChanged(StandingChangedEvent {
                    member_id,
                    from: previous,
                    to: next,
                    timestamp: now,
                }))
                .await;
        }

        Ok(StandingResponse {
            member_id: member_id.to_string(),
            standing: next,
            previous,
            changed,
            last_activity_at: inputs.last_activity_at,
            idle_days: inputs.idle_days(now),
            missed_duty_count: inputs.missed_duty_count,
            ignored_reminder_count: inputs.ignored_reminder_count,
            window_days,
        })
    }

    /// Recompute every approved member; one failure does not stop the run
    #[instrument(skip(self))]
    pub async fn sweep(&self, actor_id: Snowflake, now: DateTime<Utc>) -> ServiceResult<SweepReport> {
        let (_, position) = self.ctx.acting(actor_id).await?;
        require(&position, Capabilities::ADMINISTRATOR, "run a standing sweep")?;

        let members = self.ctx.member_repo().list_by_status(ApprovalStatus::Approved).await?;
        let mut report = SweepReport::default();

        for member in members {
            report.total_checked += 1;
            match self.recompute_at(member.id, now).await {
                Ok(result) => match result.standing {
                    Standing::Inactive => report.flagged_inactive += 1,
                    Standing::Irregular => report.flagged_irregular += 1,
                    Standing::Active => {}
                },
                Err(err) => {
                    report.errors += 1;
                    warn!(member_id = %member.id, error = %err, "Standing recomputation failed");
                }
            }
        }

        info!(
            total = report.total_checked,
            inactive = report.flagged_inactive,
            irregular = report.flagged_irregular,
            errors = report.errors,
            "Standing sweep complete"
        );
        Ok(report)
    }

    /// Audit entries targeting a member, newest first
    #[instrument(skip(self))]
    pub async fn history(&self, member_id: Snowflake, limit: Option<i64>) -> ServiceResult<Vec<AuditEntryResponse>> {
        self.ctx.member(member_id).await?;
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);
        let entries = self.ctx.audit_repo().list_by_target(member_id, limit).await?;
        Ok(entries.iter().map(AuditEntryResponse::from).collect())
    }

    async fn record(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        kind: AuditKind,
        reason: Option<String>,
    ) -> ServiceResult<StandingResponse> {
        self.supervises(actor_id, member_id).await?;
        self.append(actor_id, member_id, kind, reason).await?;
        info!(member_id = %member_id, recorded_by = %actor_id, kind = %kind, "Duty event recorded");
        self.recompute(member_id).await
    }

    /// Actor may record duty for the member: the same authority a warning needs
    async fn supervises(&self, actor_id: Snowflake, member_id: Snowflake) -> ServiceResult<()> {
        let (_, actor) = self.ctx.acting(actor_id).await?;
        require(&actor, Capabilities::RECORD_DUTY, "record duty events")?;
        if actor_id == member_id {
            return Err(DomainError::SelfTarget.into());
        }
        let target = self.ctx.member(member_id).await?;
        can_discipline(
            &self.ctx.catalog().tree,
            &actor,
            &self.ctx.rank_of(&target),
            DisciplinaryType::Warning,
        )?;
        Ok(())
    }

    async fn append(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        kind: AuditKind,
        reason: Option<String>,
    ) -> ServiceResult<()> {
        let entry = self.ctx.audit(kind, Some(actor_id), member_id).with_reason(reason);
        self.ctx.audit_repo().append(&entry).await?;
        Ok(())
    }
}
