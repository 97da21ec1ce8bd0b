//! Domain events - emitted after a governance operation commits
//!
//! Events are handed to the notification dispatcher. They carry the members
//! who should hear about the change so the dispatcher never has to look
//! anything up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{
    DisciplinaryType, Level, ReviewOutcome, Rung, Snowflake, Standing, Tier, TierPath,
};

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Member Events
    // =========================================================================
    MemberRegistered(MemberRegisteredEvent),
    MemberDecided(MemberDecidedEvent),
    PositionChanged(PositionChangedEvent),

    // =========================================================================
    // Disciplinary Events
    // =========================================================================
    DisciplinaryIssued(DisciplinaryIssuedEvent),
    DismissalDecided(DismissalDecidedEvent),
    DisciplinaryResolved(DisciplinaryResolvedEvent),

    // =========================================================================
    // Report Events
    // =========================================================================
    ReportSubmitted(ReportSubmittedEvent),
    ReportReviewed(ReportReviewedEvent),
    EscalationIncomplete(EscalationIncompleteEvent),

    // =========================================================================
    // Content Events
    // =========================================================================
    ContentDecided(ContentDecidedEvent),

    // =========================================================================
    // Standing Events
    // =========================================================================
    StandingChanged(StandingChangedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MemberRegistered(_) => "MEMBER_REGISTERED",
            Self::MemberDecided(_) => "MEMBER_DECIDED",
            Self::PositionChanged(_) => "POSITION_CHANGED",
            Self::DisciplinaryIssued(_) => "DISCIPLINARY_ISSUED",
            Self::DismissalDecided(_) => "DISMISSAL_DECIDED",
            Self::DisciplinaryResolved(_) => "DISCIPLINARY_RESOLVED",
            Self::ReportSubmitted(_) => "REPORT_SUBMITTED",
            Self::ReportReviewed(_) => "REPORT_REVIEWED",
            Self::EscalationIncomplete(_) => "ESCALATION_INCOMPLETE",
            Self::ContentDecided(_) => "CONTENT_DECIDED",
            Self::StandingChanged(_) => "STANDING_CHANGED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::MemberRegistered(e) => e.timestamp,
            Self::MemberDecided(e) => e.timestamp,
            Self::PositionChanged(e) => e.timestamp,
            Self::DisciplinaryIssued(e) => e.timestamp,
            Self::DismissalDecided(e) => e.timestamp,
            Self::DisciplinaryResolved(e) => e.timestamp,
            Self::ReportSubmitted(e) => e.timestamp,
            Self::ReportReviewed(e) => e.timestamp,
            Self::EscalationIncomplete(e) => e.timestamp,
            Self::ContentDecided(e) => e.timestamp,
            Self::StandingChanged(e) => e.timestamp,
        }
    }

    /// Members who should be told about this event
    pub fn recipients(&self) -> Vec<Snowflake> {
        let mut ids = match self {
            Self::MemberRegistered(e) => vec![e.member_id],
            Self::MemberDecided(e) => vec![e.member_id],
            Self::PositionChanged(e) => vec![e.member_id],
            Self::DisciplinaryIssued(e) => vec![e.target_member_id, e.issuer_member_id],
            Self::DismissalDecided(e) => vec![e.target_member_id, e.issuer_member_id],
            Self::DisciplinaryResolved(e) => vec![e.target_member_id],
            Self::ReportSubmitted(e) => vec![e.submitted_to_id],
            Self::ReportReviewed(e) => vec![e.submitted_by_id],
            Self::EscalationIncomplete(e) => vec![e.reviewer_id],
            Self::ContentDecided(e) => vec![e.author_id],
            Self::StandingChanged(e) => vec![e.member_id],
        };
        ids.dedup();
        ids
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRegisteredEvent {
    pub member_id: Snowflake,
    pub role_tier: Tier,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDecidedEvent {
    pub member_id: Snowflake,
    pub decided_by: Snowflake,
    pub approved: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionChangedEvent {
    pub member_id: Snowflake,
    pub changed_by: Snowflake,
    pub from_tier: Tier,
    pub to_tier: Tier,
    pub seat_id: Option<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplinaryIssuedEvent {
    pub action_id: Snowflake,
    pub target_member_id: Snowflake,
    pub issuer_member_id: Snowflake,
    pub action_type: DisciplinaryType,
    /// Rung that must approve, for dismissals awaiting approval
    pub required_approver: Option<Rung>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissalDecidedEvent {
    pub action_id: Snowflake,
    pub target_member_id: Snowflake,
    pub issuer_member_id: Snowflake,
    pub approver_member_id: Snowflake,
    pub approved: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplinaryResolvedEvent {
    pub action_id: Snowflake,
    pub target_member_id: Snowflake,
    pub resolved_by: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSubmittedEvent {
    pub report_id: Snowflake,
    pub tier_path: TierPath,
    pub submitted_by_id: Snowflake,
    pub submitted_to_id: Snowflake,
    /// Set when the report was spawned by escalation
    pub parent_report_id: Option<Snowflake>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportReviewedEvent {
    pub report_id: Snowflake,
    pub submitted_by_id: Snowflake,
    pub reviewed_by_id: Snowflake,
    pub outcome: ReviewOutcome,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationIncompleteEvent {
    pub report_id: Snowflake,
    pub reviewer_id: Snowflake,
    pub path: TierPath,
    pub vacant_level: Level,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDecidedEvent {
    pub content_id: Snowflake,
    pub author_id: Snowflake,
    pub decided_by: Snowflake,
    pub published: bool,
    pub auto_approved: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingChangedEvent {
    pub member_id: Snowflake,
    pub from: Standing,
    pub to: Standing,
    pub timestamp: DateTime<Utc>,
}
