//! Report entity - the Ward → LGA → Zonal → State reporting chain
//!
//! `DRAFT → SUBMITTED → {APPROVED, FLAGGED, REJECTED}`, and
//! `APPROVED → ESCALATED` once a child report exists at the next tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ReportStatus, ReviewOutcome, Snowflake, TierPath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: Snowflake,
    pub tier_path: TierPath,
    pub submitted_by_id: Snowflake,
    pub submitted_to_id: Option<Snowflake>,
    /// Jurisdiction of the member who started the chain; inherited by every
    /// escalated child and used to route it
    pub origin_jurisdiction_id: Snowflake,
    pub title: String,
    pub content: String,
    pub period: String,
    pub status: ReportStatus,
    pub parent_report_id: Option<Snowflake>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_reviewed: bool,
    pub reviewed_by_id: Option<Snowflake>,
    pub review_notes: Option<String>,
    /// Approved, but the next-tier coordinator seat was vacant
    pub escalation_pending: bool,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub escalated_at: Option<DateTime<Utc>>,
}

/// Fields a member supplies when filing a report
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub tier_path: TierPath,
    pub title: String,
    pub content: String,
    pub period: String,
    pub deadline: Option<DateTime<Utc>>,
}

impl Report {
    pub fn draft(
        id: Snowflake,
        submitted_by_id: Snowflake,
        origin_jurisdiction_id: Snowflake,
        draft: ReportDraft,
    ) -> Self {
        Self {
            id,
            tier_path: draft.tier_path,
            submitted_by_id,
            submitted_to_id: None,
            origin_jurisdiction_id,
            title: draft.title,
            content: draft.content,
            period: draft.period,
            status: ReportStatus::Draft,
            parent_report_id: None,
            deadline: draft.deadline,
            is_reviewed: false,
            reviewed_by_id: None,
            review_notes: None,
            escalation_pending: false,
            created_at: Utc::now(),
            submitted_at: None,
            reviewed_at: None,
            escalated_at: None,
        }
    }

    pub fn submit(&mut self, supervisor_id: Snowflake) -> Result<(), DomainError> {
        if self.status != ReportStatus::Draft {
            return Err(DomainError::invalid_transition(
                "report",
                self.status,
                ReportStatus::Submitted,
            ));
        }
        self.submitted_to_id = Some(supervisor_id);
        self.status = ReportStatus::Submitted;
        self.submitted_at = Some(Utc::now());
        Ok(())
    }

    pub fn review(
        &mut self,
        reviewer_id: Snowflake,
        outcome: ReviewOutcome,
        notes: Option<String>,
    ) -> Result<(), DomainError> {
        let next = ReportStatus::from(outcome);
        if self.status != ReportStatus::Submitted {
            return Err(DomainError::invalid_transition("report", self.status, next));
        }
        self.status = next;
        self.is_reviewed = true;
        self.reviewed_by_id = Some(reviewer_id);
        self.review_notes = notes;
        self.reviewed_at = Some(Utc::now());
        Ok(())
    }

    /// Whether an escalation attempt is allowed at all
    pub fn can_be_escalated(&self) -> bool {
        self.status == ReportStatus::Approved
            && self.escalated_at.is_none()
            && self.tier_path.next().is_some()
    }

    /// Check escalation preconditions, distinguishing a repeat attempt
    pub fn ensure_escalatable(&self) -> Result<TierPath, DomainError> {
        if self.status == ReportStatus::Escalated || self.escalated_at.is_some() {
            return Err(DomainError::AlreadyEscalated(self.id));
        }
        if self.status != ReportStatus::Approved {
            return Err(DomainError::invalid_transition(
                "report",
                self.status,
                ReportStatus::Escalated,
            ));
        }
        self.tier_path.next().ok_or_else(|| {
            DomainError::ValidationError(format!(
                "{} is the final tier and cannot be escalated",
                self.tier_path
            ))
        })
    }

    /// Build the next-tier report spawned by escalating this one
    ///
    /// The child starts SUBMITTED, addressed to `submitted_to_id`, filed in
    /// the name of `submitted_by_id`, and its body is prefixed with where it
    /// came from and who approved it.
    pub fn escalated_child(
        &self,
        id: Snowflake,
        submitted_by_id: Snowflake,
        submitted_to_id: Snowflake,
        provenance: &str,
    ) -> Result<Report, DomainError> {
        let tier_path = self.ensure_escalatable()?;
        let now = Utc::now();
        Ok(Report {
            id,
            tier_path,
            submitted_by_id,
            submitted_to_id: Some(submitted_to_id),
            origin_jurisdiction_id: self.origin_jurisdiction_id,
            title: format!("[Escalated] {}", self.title),
            content: format!("{provenance}\n\n{}", self.content),
            period: self.period.clone(),
            status: ReportStatus::Submitted,
            parent_report_id: Some(self.id),
            deadline: self.deadline,
            is_reviewed: false,
            reviewed_by_id: None,
            review_notes: None,
            escalation_pending: false,
            created_at: now,
            submitted_at: Some(now),
            reviewed_at: None,
            escalated_at: None,
        })
    }

    pub fn mark_escalated(&mut self) {
        self.status = ReportStatus::Escalated;
        self.escalation_pending = false;
        self.escalated_at = Some(Utc::now());
    }

    /// Deadline passed while the report was still waiting on its author or reviewer
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, ReportStatus::Draft | ReportStatus::Submitted)
            && self.deadline.is_some_and(|deadline| now > deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ward_report() -> Report {
        Report::draft(
            Snowflake::new(1),
            Snowflake::new(10),
            Snowflake::new(500),
            ReportDraft {
                tier_path: TierPath::WardToLga,
                title: "March activities".into(),
                content: "Voter education held at two polling units.".into(),
                period: "2026-03".into(),
                deadline: None,
            },
        )
    }

    #[test]
    fn test_submit_and_review() {
        let mut report = ward_report();
        assert_eq!(report.status, ReportStatus::Draft);

        report.submit(Snowflake::new(20)).unwrap();
        assert_eq!(report.status, ReportStatus::Submitted);
        assert_eq!(report.submitted_to_id, Some(Snowflake::new(20)));
        assert!(report.submit(Snowflake::new(20)).is_err());

        report
            .review(Snowflake::new(20), ReviewOutcome::Approved, Some("good".into()))
            .unwrap();
        assert_eq!(report.status, ReportStatus::Approved);
        assert!(report.is_reviewed);
        assert!(report.can_be_escalated());

        let err = report
            .review(Snowflake::new(20), ReviewOutcome::Rejected, None)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn test_review_requires_submission() {
        let mut report = ward_report();
        assert!(report
            .review(Snowflake::new(20), ReviewOutcome::Approved, None)
            .is_err());
    }

    #[test]
    fn test_escalated_child() {
        let mut report = ward_report();
        report.submit(Snowflake::new(20)).unwrap();
        report
            .review(Snowflake::new(20), ReviewOutcome::Approved, None)
            .unwrap();

        let child = report
            .escalated_child(Snowflake::new(2), Snowflake::new(20), Snowflake::new(30), "From ward")
            .unwrap();
        assert_eq!(child.tier_path, TierPath::LgaToZonal);
        assert_eq!(child.parent_report_id, Some(report.id));
        assert_eq!(child.origin_jurisdiction_id, report.origin_jurisdiction_id);
        assert_eq!(child.status, ReportStatus::Submitted);
        assert!(child.content.starts_with("From ward"));

        report.mark_escalated();
        assert!(!report.can_be_escalated());
        assert!(matches!(
            report.ensure_escalatable(),
            Err(DomainError::AlreadyEscalated(_))
        ));
    }

    #[test]
    fn test_final_tier_never_escalates() {
        let mut report = ward_report();
        report.tier_path = TierPath::ZonalToState;
        report.status = ReportStatus::Approved;
        assert!(!report.can_be_escalated());
        assert!(matches!(
            report.ensure_escalatable(),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        let mut report = ward_report();
        assert!(!report.is_overdue(now));

        report.deadline = Some(now - Duration::days(1));
        assert!(report.is_overdue(now));

        report.status = ReportStatus::Approved;
        assert!(!report.is_overdue(now));
    }
}
