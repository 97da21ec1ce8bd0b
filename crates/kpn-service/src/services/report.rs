//! Report routing and escalation
//!
//! A report is addressed to whoever holds the coordinator seat of the next
//! level up from where it was filed. Approving a report can escalate it one
//! tier further; when that seat is vacant the parent keeps its APPROVED
//! status and is flagged as pending escalation instead of failing the
//! review.

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument, warn};

use kpn_core::events::{EscalationIncompleteEvent, ReportReviewedEvent, ReportSubmittedEvent};
use kpn_core::governance::require;
use kpn_core::{
    AuditKind, Capabilities, DomainError, DomainEvent, Level, Member, Report, ReportDraft,
    ReportStatus, ReviewOutcome, Snowflake, TierPath,
};

use crate::dto::{CreateReportRequest, EscalationResponse, ReportResponse, ReviewReportRequest, ReviewResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What an escalation attempt produced
#[derive(Debug, Clone)]
pub enum EscalationOutcome {
    /// Child report filed with the next-tier supervisor
    Escalated(Report),
    /// Next-tier coordinator seat is vacant
    Pending { vacant_level: Level },
}

impl From<EscalationOutcome> for EscalationResponse {
    fn from(outcome: EscalationOutcome) -> Self {
        match outcome {
            EscalationOutcome::Escalated(child) => EscalationResponse::Escalated {
                child: ReportResponse::from(&child),
            },
            EscalationOutcome::Pending { vacant_level } => EscalationResponse::Pending { vacant_level },
        }
    }
}

/// Report service
pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// File a report and address it to the next-level coordinator
    #[instrument(skip(self, request), fields(tier_path = %request.tier_path))]
    pub async fn submit(&self, submitter_id: Snowflake, request: CreateReportRequest) -> ServiceResult<ReportResponse> {
        let mut report = self.draft(submitter_id, request).await?;
        let supervisor = self.supervisor_for(report.tier_path, report.origin_jurisdiction_id).await?;
        report.submit(supervisor.id)?;

        let audit = self.submission_audit(&report);
        self.ctx.report_repo().create(&report, Some(&audit)).await?;

        info!(report_id = %report.id, submitted_to = %supervisor.id, "Report submitted");
        self.notify_submitted(&report).await;

        Ok(ReportResponse::from(&report))
    }

    /// Save a report without sending it
    #[instrument(skip(self, request), fields(tier_path = %request.tier_path))]
    pub async fn create_draft(
        &self,
        submitter_id: Snowflake,
        request: CreateReportRequest,
    ) -> ServiceResult<ReportResponse> {
        let report = self.draft(submitter_id, request).await?;
        let audit = self
            .ctx
            .audit(AuditKind::ReportDrafted, Some(submitter_id), submitter_id)
            .with_change(&Value::Null, &report.status)
            .with_reason(Some(format!("{}: {}", report.tier_path, report.title)));
        self.ctx.report_repo().create(&report, Some(&audit)).await?;

        info!(report_id = %report.id, "Report drafted");
        Ok(ReportResponse::from(&report))
    }

    /// Send a saved draft; the supervisor is resolved at send time
    #[instrument(skip(self))]
    pub async fn submit_draft(&self, submitter_id: Snowflake, report_id: Snowflake) -> ServiceResult<ReportResponse> {
        let mut report = self.find(report_id).await?;
        if report.submitted_by_id != submitter_id {
            return Err(DomainError::PermissionDenied("only the author may submit a draft report".into()).into());
        }
        let supervisor = self.supervisor_for(report.tier_path, report.origin_jurisdiction_id).await?;
        report.submit(supervisor.id)?;

        let audit = self.submission_audit(&report);
        self.ctx
            .report_repo()
            .update(&report, ReportStatus::Draft, &audit)
            .await?;

        info!(report_id = %report.id, submitted_to = %supervisor.id, "Draft report submitted");
        self.notify_submitted(&report).await;

        Ok(ReportResponse::from(&report))
    }

    /// Approve, flag or reject a submitted report
    ///
    /// With auto-escalation enabled, an approval on a non-final path
    /// escalates in the same call.
    #[instrument(skip(self, request), fields(outcome = %request.outcome))]
    pub async fn review(
        &self,
        reviewer_id: Snowflake,
        report_id: Snowflake,
        request: ReviewReportRequest,
    ) -> ServiceResult<ReviewResponse> {
        let (reviewer, position) = self.ctx.acting(reviewer_id).await?;
        require(&position, Capabilities::REVIEW_REPORTS, "review reports")?;

        let mut report = self.find(report_id).await?;
        if report.submitted_to_id != Some(reviewer_id) && !position.is_top() {
            return Err(DomainError::PermissionDenied(
                "only the addressed supervisor or the top seat may review this report".into(),
            )
            .into());
        }

        let before = report.status;
        report.review(reviewer_id, request.outcome, request.notes)?;
        let audit = self
            .ctx
            .audit(AuditKind::ReportReviewed, Some(reviewer_id), report.submitted_by_id)
            .with_change(&before, &report.status)
            .with_reason(report.review_notes.clone());
        self.ctx
            .report_repo()
            .update(&report, ReportStatus::Submitted, &audit)
            .await?;

        info!(report_id = %report_id, reviewer = %reviewer_id, outcome = %request.outcome, "Report reviewed");

        self.ctx
            .notify(DomainEvent::ReportReviewed(ReportReviewedEvent {
                report_id,
                submitted_by_id: report.submitted_by_id,
                reviewed_by_id: reviewer_id,
                outcome: request.outcome,
                timestamp: Utc::now(),
            }))
            .await;

        let escalation = if request.outcome == ReviewOutcome::Approved
            && self.ctx.governance().auto_escalate
            && report.tier_path.next().is_some()
        {
            let outcome = self.escalate_inner(&reviewer, &mut report).await?;
            Some(EscalationResponse::from(outcome))
        } else {
            None
        };

        Ok(ReviewResponse {
            report: ReportResponse::from(&report),
            escalation,
        })
    }

    /// Escalate an approved report by hand
    ///
    /// Used when auto-escalation is off or a vacant seat has since been
    /// filled.
    #[instrument(skip(self))]
    pub async fn escalate(&self, reviewer_id: Snowflake, report_id: Snowflake) -> ServiceResult<EscalationResponse> {
        let (reviewer, position) = self.ctx.acting(reviewer_id).await?;
        let mut report = self.find(report_id).await?;
        if report.reviewed_by_id != Some(reviewer_id) && !position.is_top() {
            return Err(DomainError::PermissionDenied(
                "only the approving reviewer or the top seat may escalate this report".into(),
            )
            .into());
        }
        report.ensure_escalatable()?;

        let outcome = self.escalate_inner(&reviewer, &mut report).await?;
        Ok(EscalationResponse::from(outcome))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, report_id: Snowflake) -> ServiceResult<ReportResponse> {
        let report = self.find(report_id).await?;
        Ok(ReportResponse::from(&report))
    }

    /// Reports addressed to a member, newest first
    #[instrument(skip(self))]
    pub async fn inbox(&self, member_id: Snowflake) -> ServiceResult<Vec<ReportResponse>> {
        let reports = self.ctx.report_repo().list_submitted_to(member_id).await?;
        Ok(reports.iter().map(ReportResponse::from).collect())
    }

    /// Reports a member filed, drafts included
    #[instrument(skip(self))]
    pub async fn outbox(&self, member_id: Snowflake) -> ServiceResult<Vec<ReportResponse>> {
        let reports = self.ctx.report_repo().list_submitted_by(member_id).await?;
        Ok(reports.iter().map(ReportResponse::from).collect())
    }

    /// Full escalation chain containing a report, lowest tier first
    #[instrument(skip(self))]
    pub async fn chain(&self, report_id: Snowflake) -> ServiceResult<Vec<ReportResponse>> {
        let mut root = self.find(report_id).await?;
        while let Some(parent_id) = root.parent_report_id {
            root = self.find(parent_id).await?;
        }

        let mut chain = vec![root];
        loop {
            let last = chain.last().map(|r| r.id);
            let Some(last) = last else { break };
            let mut children = self.ctx.report_repo().find_children(last).await?;
            if children.is_empty() {
                break;
            }
            chain.push(children.remove(0));
        }
        Ok(chain.iter().map(ReportResponse::from).collect())
    }

    async fn find(&self, report_id: Snowflake) -> ServiceResult<Report> {
        self.ctx
            .report_repo()
            .find_by_id(report_id)
            .await?
            .ok_or_else(|| DomainError::ReportNotFound(report_id).into())
    }

    /// Build a draft after checking the submitter may file on this path
    async fn draft(&self, submitter_id: Snowflake, request: CreateReportRequest) -> ServiceResult<Report> {
        let (submitter, position) = self.ctx.acting(submitter_id).await?;
        require(&position, Capabilities::SUBMIT_REPORTS, "submit reports")?;

        let path = request.tier_path;
        if submitter.role_tier != path.submitter_tier() {
            return Err(DomainError::PermissionDenied(format!(
                "{path} reports are filed by {} members",
                path.submitter_tier()
            ))
            .into());
        }
        let origin = submitter.jurisdiction_id.ok_or(DomainError::JurisdictionRequired {
            tier: submitter.role_tier,
            level: path.submitter_tier().seat_level().unwrap_or(Level::Ward),
        })?;

        Ok(Report::draft(
            self.ctx.generate_id(),
            submitter_id,
            origin,
            ReportDraft {
                tier_path: path,
                title: request.title.trim().to_string(),
                content: request.content,
                period: request.period.trim().to_string(),
                deadline: request.deadline,
            },
        ))
    }

    /// Approved holder of the coordinator seat that receives `path` reports
    /// filed from `origin`
    async fn supervisor_for(&self, path: TierPath, origin: Snowflake) -> ServiceResult<Member> {
        let level = path.receiver_level();
        let catalog = self.ctx.catalog();
        let vacant = || DomainError::NoSupervisorFound {
            path,
            level,
            jurisdiction_id: None,
        };

        let seat = catalog.seats.coordinator_seat(level).ok_or_else(vacant)?;
        let node = catalog.tree.ancestor_at(origin, level)?.ok_or_else(vacant)?;
        let repo = self.ctx.member_repo();

        let holder = if level == Level::State {
            match repo.find_seat_holder(seat.id, None).await? {
                Some(member) => Some(member),
                None => repo.find_seat_holder(seat.id, Some(node.id)).await?,
            }
        } else {
            repo.find_seat_holder(seat.id, Some(node.id)).await?
        };

        holder.filter(Member::is_approved).ok_or_else(|| {
            DomainError::NoSupervisorFound {
                path,
                level,
                jurisdiction_id: Some(node.id),
            }
            .into()
        })
    }

    /// Spawn the next-tier child, or flag the parent when the seat is empty
    async fn escalate_inner(&self, reviewer: &Member, report: &mut Report) -> ServiceResult<EscalationOutcome> {
        let next = report.ensure_escalatable()?;

        let supervisor = match self.supervisor_for(next, report.origin_jurisdiction_id).await {
            Ok(supervisor) => supervisor,
            Err(err) => match err.as_domain() {
                Some(DomainError::NoSupervisorFound { level, .. }) => {
                    let level = *level;
                    return self.defer(reviewer, report, next, level).await;
                }
                _ => return Err(err),
            },
        };

        let submitter = self.ctx.member(report.submitted_by_id).await?;
        let provenance = format!(
            "Escalated from {} report {} submitted by {} ({}) and approved by {} ({})",
            report.tier_path,
            report.id,
            submitter.full_name,
            submitter.role_tier,
            reviewer.full_name,
            reviewer.role_tier
        );
        let child = report.escalated_child(self.ctx.generate_id(), reviewer.id, supervisor.id, &provenance)?;

        let mut parent = report.clone();
        parent.mark_escalated();
        let audit = self
            .ctx
            .audit(AuditKind::ReportEscalated, Some(reviewer.id), report.submitted_by_id)
            .with_change(&report.status, &parent.status)
            .with_reason(Some(format!("escalated as report {} to {next}", child.id)));
        self.ctx.report_repo().escalate(&parent, &child, &audit).await?;
        *report = parent;

        info!(
            report_id = %report.id,
            child_id = %child.id,
            submitted_to = %supervisor.id,
            "Report escalated"
        );
        self.notify_submitted(&child).await;

        Ok(EscalationOutcome::Escalated(child))
    }

    async fn defer(
        &self,
        reviewer: &Member,
        report: &mut Report,
        next: TierPath,
        vacant_level: Level,
    ) -> ServiceResult<EscalationOutcome> {
        let audit = self
            .ctx
            .audit(AuditKind::EscalationIncomplete, Some(reviewer.id), report.submitted_by_id)
            .with_reason(Some(format!("no {vacant_level} coordinator to receive a {next} report")));
        self.ctx
            .report_repo()
            .mark_escalation_pending(report.id, &audit)
            .await?;
        report.escalation_pending = true;

        warn!(report_id = %report.id, level = %vacant_level, "Escalation pending: supervisor seat vacant");

        self.ctx
            .notify(DomainEvent::EscalationIncomplete(EscalationIncompleteEvent {
                report_id: report.id,
                reviewer_id: reviewer.id,
                path: next,
                vacant_level,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(EscalationOutcome::Pending { vacant_level })
    }

    fn submission_audit(&self, report: &Report) -> kpn_core::AuditEntry {
        self.ctx
            .audit(AuditKind::ReportSubmitted, Some(report.submitted_by_id), report.submitted_by_id)
            .with_change(&ReportStatus::Draft, &report.status)
            .with_reason(Some(format!("{}: {}", report.tier_path, report.title)))
    }

    async fn notify_submitted(&self, report: &Report) {
        let Some(submitted_to_id) = report.submitted_to_id else {
            return;
        };
        self.ctx
            .notify(DomainEvent::ReportSubmitted(ReportSubmittedEvent {
                report_id: report.id,
                tier_path: report.tier_path,
                submitted_by_id: report.submitted_by_id,
                submitted_to_id,
                parent_report_id: report.parent_report_id,
                timestamp: Utc::now(),
            }))
            .await;
    }
}
