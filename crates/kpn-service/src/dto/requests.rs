//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! IDs are accepted either as JSON numbers or as strings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use kpn_core::{ContentKind, DisciplinaryType, Level, ReviewOutcome, Snowflake, Tier, TierPath};

// ============================================================================
// Member Requests
// ============================================================================

/// Membership application
///
/// Leadership tiers must name the seat they apply for; GENERAL applicants
/// name their home ward instead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterMemberRequest {
    #[validate(length(min = 2, max = 120, message = "Full name must be 2-120 characters"))]
    pub full_name: String,

    pub role_tier: Tier,

    pub seat_id: Option<Snowflake>,

    pub jurisdiction_id: Option<Snowflake>,
}

/// Approve a pending decision, optionally with notes
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DecisionRequest {
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Reject something; a reason is mandatory
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 2000, message = "Reason must be 1-2000 characters"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignSeatRequest {
    pub seat_id: Snowflake,

    pub jurisdiction_id: Option<Snowflake>,

    /// Defaults to the member's current tier
    pub role_tier: Option<Tier>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct VacateSeatRequest {
    #[validate(length(max = 2000, message = "Reason must be at most 2000 characters"))]
    pub reason: Option<String>,
}

// ============================================================================
// Position Requests
// ============================================================================

/// Move a member up to the tier of `seat_id`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PromoteRequest {
    pub seat_id: Snowflake,

    pub jurisdiction_id: Option<Snowflake>,
}

/// Move a member down to `role_tier`; without a seat the member is left unseated
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DemoteRequest {
    pub role_tier: Tier,

    pub seat_id: Option<Snowflake>,

    pub jurisdiction_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SwapRequest {
    pub member_a_id: Snowflake,

    pub member_b_id: Snowflake,
}

// ============================================================================
// Disciplinary Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitDisciplinaryRequest {
    pub target_member_id: Snowflake,

    pub action_type: DisciplinaryType,

    #[validate(length(min = 3, max = 2000, message = "Reason must be 3-2000 characters"))]
    pub reason: String,
}

// ============================================================================
// Report Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub tier_path: TierPath,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 20000, message = "Content must be 1-20000 characters"))]
    pub content: String,

    /// Reporting period label, e.g. "2026-06"
    #[validate(length(min = 1, max = 50, message = "Period must be 1-50 characters"))]
    pub period: String,

    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewReportRequest {
    pub outcome: ReviewOutcome,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Content Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContentRequest {
    pub kind: ContentKind,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 50000, message = "Body must be 1-50000 characters"))]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EditContentRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 50000, message = "Body must be 1-50000 characters"))]
    pub body: Option<String>,
}

// ============================================================================
// Standing Requests
// ============================================================================

/// Missed duty, ignored reminder, activity or counter reset
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DutyEventRequest {
    #[validate(length(max = 2000, message = "Reason must be at most 2000 characters"))]
    pub reason: Option<String>,
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JurisdictionQuery {
    pub level: Option<Level>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatQuery {
    pub tier: Option<Tier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_accepts_string_ids() {
        let request: RegisterMemberRequest = serde_json::from_value(json!({
            "full_name": "Aisha Bello",
            "role_tier": "WARD",
            "seat_id": "1000031",
            "jurisdiction_id": 27
        }))
        .unwrap();
        assert_eq!(request.role_tier, Tier::Ward);
        assert_eq!(request.seat_id, Some(Snowflake::new(1_000_031)));
        assert_eq!(request.jurisdiction_id, Some(Snowflake::new(27)));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_short_name_is_rejected() {
        let request = RegisterMemberRequest {
            full_name: "A".into(),
            role_tier: Tier::General,
            seat_id: None,
            jurisdiction_id: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_reject_request_needs_reason() {
        assert!(RejectRequest { reason: String::new() }.validate().is_err());
        assert!(RejectRequest { reason: "duplicate".into() }.validate().is_ok());
    }

    #[test]
    fn test_review_outcome_parses() {
        let request: ReviewReportRequest =
            serde_json::from_value(json!({ "outcome": "FLAGGED" })).unwrap();
        assert_eq!(request.outcome, ReviewOutcome::Flagged);
        assert!(request.notes.is_none());
    }
}
