//! Audit entry entity - append-only record of every engine mutation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::Snowflake;

/// Kind of mutation an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditKind {
    // Member registry
    MemberRegistered,
    MemberApproved,
    MemberRejected,
    SeatAssigned,
    SeatVacated,

    // Promotion engine
    Promotion,
    Demotion,
    PositionSwap,

    // Disciplinary workflow
    DisciplinaryIssued,
    Suspension,
    Dismissal,
    DismissalRejected,
    DisciplinaryResolved,

    // Reports
    ReportDrafted,
    ReportSubmitted,
    ReportReviewed,
    ReportEscalated,
    EscalationIncomplete,

    // Content
    ContentCreated,
    ContentEdited,
    ContentSubmitted,
    ContentPublished,
    ContentRejected,

    // Standing
    DutyMissed,
    ReminderIgnored,
    ActivityRecorded,
    CountersReset,
    StandingChanged,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MemberRegistered => "MEMBER_REGISTERED",
            Self::MemberApproved => "MEMBER_APPROVED",
            Self::MemberRejected => "MEMBER_REJECTED",
            Self::SeatAssigned => "SEAT_ASSIGNED",
            Self::SeatVacated => "SEAT_VACATED",
            Self::Promotion => "PROMOTION",
            Self::Demotion => "DEMOTION",
            Self::PositionSwap => "POSITION_SWAP",
            Self::DisciplinaryIssued => "DISCIPLINARY_ISSUED",
            Self::Suspension => "SUSPENSION",
            Self::Dismissal => "DISMISSAL",
            Self::DismissalRejected => "DISMISSAL_REJECTED",
            Self::DisciplinaryResolved => "DISCIPLINARY_RESOLVED",
            Self::ReportDrafted => "REPORT_DRAFTED",
            Self::ReportSubmitted => "REPORT_SUBMITTED",
            Self::ReportReviewed => "REPORT_REVIEWED",
            Self::ReportEscalated => "REPORT_ESCALATED",
            Self::EscalationIncomplete => "ESCALATION_INCOMPLETE",
            Self::ContentCreated => "CONTENT_CREATED",
            Self::ContentEdited => "CONTENT_EDITED",
            Self::ContentSubmitted => "CONTENT_SUBMITTED",
            Self::ContentPublished => "CONTENT_PUBLISHED",
            Self::ContentRejected => "CONTENT_REJECTED",
            Self::DutyMissed => "DUTY_MISSED",
            Self::ReminderIgnored => "REMINDER_IGNORED",
            Self::ActivityRecorded => "ACTIVITY_RECORDED",
            Self::CountersReset => "COUNTERS_RESET",
            Self::StandingChanged => "STANDING_CHANGED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    pub const ALL: [AuditKind; 28] = [
        Self::MemberRegistered,
        Self::MemberApproved,
        Self::MemberRejected,
        Self::SeatAssigned,
        Self::SeatVacated,
        Self::Promotion,
        Self::Demotion,
        Self::PositionSwap,
        Self::DisciplinaryIssued,
        Self::Suspension,
        Self::Dismissal,
        Self::DismissalRejected,
        Self::DisciplinaryResolved,
        Self::ReportDrafted,
        Self::ReportSubmitted,
        Self::ReportReviewed,
        Self::ReportEscalated,
        Self::EscalationIncomplete,
        Self::ContentCreated,
        Self::ContentEdited,
        Self::ContentSubmitted,
        Self::ContentPublished,
        Self::ContentRejected,
        Self::DutyMissed,
        Self::ReminderIgnored,
        Self::ActivityRecorded,
        Self::CountersReset,
        Self::StandingChanged,
    ];

    /// Entries of these kinds count against the target
    pub fn is_punitive(&self) -> bool {
        matches!(
            self,
            Self::MemberRejected
                | Self::Demotion
                | Self::DisciplinaryIssued
                | Self::Suspension
                | Self::Dismissal
                | Self::DutyMissed
                | Self::ReminderIgnored
        )
    }

    /// Entries of these kinds refresh the target's last-activity time
    pub fn counts_as_target_activity(&self) -> bool {
        !self.is_punitive()
            && !matches!(
                self,
                Self::StandingChanged
                    | Self::CountersReset
                    | Self::SeatVacated
                    | Self::DismissalRejected
                    | Self::EscalationIncomplete
            )
    }
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Snowflake,
    pub action_kind: AuditKind,
    /// Absent for entries the engine records on its own behalf
    pub performed_by_id: Option<Snowflake>,
    pub target_member_id: Snowflake,
    pub before_snapshot: Value,
    pub after_snapshot: Value,
    pub reason: Option<String>,
    pub auto_generated: bool,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        id: Snowflake,
        action_kind: AuditKind,
        performed_by_id: Option<Snowflake>,
        target_member_id: Snowflake,
    ) -> Self {
        Self {
            id,
            action_kind,
            performed_by_id,
            target_member_id,
            before_snapshot: Value::Null,
            after_snapshot: Value::Null,
            reason: None,
            auto_generated: false,
            created_at: Utc::now(),
        }
    }

    /// Attach before/after images; unserializable values are stored as null
    pub fn with_change<B: Serialize, A: Serialize>(mut self, before: &B, after: &A) -> Self {
        self.before_snapshot = serde_json::to_value(before).unwrap_or(Value::Null);
        self.after_snapshot = serde_json::to_value(after).unwrap_or(Value::Null);
        self
    }

    pub fn with_reason(mut self, reason: Option<impl Into<String>>) -> Self {
        self.reason = reason.map(Into::into);
        self
    }

    pub fn auto_generated(mut self) -> Self {
        self.auto_generated = true;
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// One-line human readable summary
    pub fn describe(&self) -> String {
        let actor = match self.performed_by_id {
            Some(id) if id == self.target_member_id => "Self".to_string(),
            Some(id) => format!("Member {id}"),
            None => "System".to_string(),
        };
        let target = self.target_member_id;
        let text = match self.action_kind {
            AuditKind::MemberRegistered => format!("member {target} registered"),
            AuditKind::MemberApproved => format!("{actor} approved membership of {target}"),
            AuditKind::MemberRejected => format!("{actor} rejected membership of {target}"),
            AuditKind::SeatAssigned => format!("{actor} assigned a seat to {target}"),
            AuditKind::SeatVacated => format!("{actor} vacated the seat of {target}"),
            AuditKind::Promotion => format!("{actor} promoted {target}"),
            AuditKind::Demotion => format!("{actor} demoted {target}"),
            AuditKind::PositionSwap => format!("{actor} facilitated a position swap involving {target}"),
            AuditKind::DisciplinaryIssued => format!("{actor} issued a disciplinary action against {target}"),
            AuditKind::Suspension => format!("{actor} suspended {target}"),
            AuditKind::Dismissal => format!("{actor} dismissed {target}"),
            AuditKind::DismissalRejected => format!("{actor} rejected the dismissal of {target}"),
            AuditKind::DisciplinaryResolved => format!("{actor} resolved a disciplinary action on {target}"),
            AuditKind::ReportDrafted => format!("{actor} drafted a report for {target}"),
            AuditKind::ReportSubmitted => format!("{actor} submitted a report for {target}"),
            AuditKind::ReportReviewed => format!("{actor} reviewed a report by {target}"),
            AuditKind::ReportEscalated => format!("{actor} escalated a report by {target}"),
            AuditKind::EscalationIncomplete => format!("escalation of a report by {target} awaits a supervisor"),
            AuditKind::ContentCreated => format!("{actor} drafted content by {target}"),
            AuditKind::ContentEdited => format!("{actor} edited content by {target}"),
            AuditKind::ContentSubmitted => format!("{actor} submitted content by {target}"),
            AuditKind::ContentPublished => format!("{actor} published content by {target}"),
            AuditKind::ContentRejected => format!("{actor} rejected content by {target}"),
            AuditKind::DutyMissed => format!("{actor} recorded a missed duty for {target}"),
            AuditKind::ReminderIgnored => format!("{actor} recorded an ignored reminder for {target}"),
            AuditKind::ActivityRecorded => format!("{actor} recorded activity for {target}"),
            AuditKind::CountersReset => format!("{actor} reset duty counters for {target}"),
            AuditKind::StandingChanged => format!("standing of {target} changed"),
        };

        match &self.reason {
            Some(reason) if !reason.is_empty() => format!("{text}: {reason}"),
            _ => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_text_roundtrip() {
        for kind in AuditKind::ALL {
            assert_eq!(AuditKind::parse(kind.as_str()), Some(kind));
            assert_eq!(
                serde_json::to_string(&kind).unwrap(),
                format!("\"{}\"", kind.as_str())
            );
        }
    }

    #[test]
    fn test_activity_classification() {
        assert!(AuditKind::Promotion.counts_as_target_activity());
        assert!(AuditKind::ActivityRecorded.counts_as_target_activity());
        assert!(AuditKind::ContentEdited.counts_as_target_activity());
        assert!(AuditKind::ReportDrafted.counts_as_target_activity());
        assert!(!AuditKind::Demotion.counts_as_target_activity());
        assert!(!AuditKind::DutyMissed.counts_as_target_activity());
        assert!(!AuditKind::StandingChanged.counts_as_target_activity());
    }

    #[test]
    fn test_snapshots_and_description() {
        let entry = AuditEntry::new(
            Snowflake::new(1),
            AuditKind::Promotion,
            Some(Snowflake::new(2)),
            Snowflake::new(3),
        )
        .with_change(&json!({"tier": "WARD"}), &json!({"tier": "LGA"}))
        .with_reason(Some("strong mobilisation record"));

        assert_eq!(entry.before_snapshot["tier"], "WARD");
        assert_eq!(entry.after_snapshot["tier"], "LGA");
        assert_eq!(
            entry.describe(),
            "Member 2 promoted 3: strong mobilisation record"
        );
    }

    #[test]
    fn test_system_entries() {
        let entry = AuditEntry::new(Snowflake::new(1), AuditKind::StandingChanged, None, Snowflake::new(3))
            .auto_generated();
        assert!(entry.auto_generated);
        assert_eq!(entry.describe(), "standing of 3 changed");
    }
}
