//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Level, Snowflake, Tier, TierPath};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Jurisdiction not found: {0}")]
    JurisdictionNotFound(Snowflake),

    #[error("Seat not found: {0}")]
    SeatNotFound(Snowflake),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Disciplinary action not found: {0}")]
    ActionNotFound(Snowflake),

    #[error("Report not found: {0}")]
    ReportNotFound(Snowflake),

    #[error("Content item not found: {0}")]
    ContentNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Seat belongs to tier {seat_tier} but tier {requested} was requested")]
    TierMismatch { seat_tier: Tier, requested: Tier },

    #[error("A {tier} seat requires a {level} jurisdiction")]
    JurisdictionRequired { tier: Tier, level: Level },

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Member {0} is not authorized to approve this action")]
    UnauthorizedApprover(Snowflake),

    #[error("Member {0} holds a protected seat")]
    ProtectedRole(Snowflake),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Seat {seat_id} is already occupied in this jurisdiction")]
    SeatOccupied {
        seat_id: Snowflake,
        jurisdiction_id: Option<Snowflake>,
    },

    #[error("Action {0} has already been decided")]
    AlreadyResolved(Snowflake),

    #[error("Report {0} has already been escalated")]
    AlreadyEscalated(Snowflake),

    #[error("Cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("No supervisor holds the {level} coordinator seat for a {path} report")]
    NoSupervisorFound {
        path: TierPath,
        level: Level,
        jurisdiction_id: Option<Snowflake>,
    },

    #[error("A member cannot act on their own position")]
    SelfTarget,

    #[error("Cannot move from tier {from} to tier {to}")]
    InvalidTierChange { from: Tier, to: Tier },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::JurisdictionNotFound(_) => "UNKNOWN_JURISDICTION",
            Self::SeatNotFound(_) => "UNKNOWN_SEAT",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::ActionNotFound(_) => "UNKNOWN_DISCIPLINARY_ACTION",
            Self::ReportNotFound(_) => "UNKNOWN_REPORT",
            Self::ContentNotFound(_) => "UNKNOWN_CONTENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::TierMismatch { .. } => "TIER_MISMATCH",
            Self::JurisdictionRequired { .. } => "JURISDICTION_REQUIRED",
            Self::InvalidHierarchy(_) => "INVALID_HIERARCHY",

            // Authorization
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::UnauthorizedApprover(_) => "UNAUTHORIZED_APPROVER",
            Self::ProtectedRole(_) => "PROTECTED_ROLE",

            // Conflict
            Self::SeatOccupied { .. } => "SEAT_OCCUPIED",
            Self::AlreadyResolved(_) => "ALREADY_RESOLVED",
            Self::AlreadyEscalated(_) => "ALREADY_ESCALATED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",

            // Business Rules
            Self::NoSupervisorFound { .. } => "NO_SUPERVISOR_FOUND",
            Self::SelfTarget => "SELF_TARGET",
            Self::InvalidTierChange { .. } => "INVALID_TIER_CHANGE",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::NotificationError(_) => "NOTIFICATION_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::JurisdictionNotFound(_)
                | Self::SeatNotFound(_)
                | Self::MemberNotFound(_)
                | Self::ActionNotFound(_)
                | Self::ReportNotFound(_)
                | Self::ContentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::TierMismatch { .. }
                | Self::JurisdictionRequired { .. }
                | Self::InvalidHierarchy(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::UnauthorizedApprover(_) | Self::ProtectedRole(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SeatOccupied { .. }
                | Self::AlreadyResolved(_)
                | Self::AlreadyEscalated(_)
                | Self::InvalidTransition { .. }
        )
    }

    /// Check if this is a business rule violation
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::NoSupervisorFound { .. } | Self::SelfTarget | Self::InvalidTierChange { .. }
        )
    }

    pub fn invalid_transition(
        entity: &'static str,
        from: impl ToString,
        to: impl ToString,
    ) -> Self {
        Self::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::MemberNotFound(Snowflake::new(1));
        assert_eq!(err.code(), "UNKNOWN_MEMBER");

        let err = DomainError::SeatOccupied {
            seat_id: Snowflake::new(2),
            jurisdiction_id: None,
        };
        assert_eq!(err.code(), "SEAT_OCCUPIED");
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::ReportNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::ProtectedRole(Snowflake::new(1)).is_authorization());
        assert!(DomainError::UnauthorizedApprover(Snowflake::new(1)).is_authorization());
        assert!(DomainError::AlreadyResolved(Snowflake::new(1)).is_conflict());
        assert!(DomainError::TierMismatch {
            seat_tier: Tier::Lga,
            requested: Tier::Ward
        }
        .is_validation());
        assert!(DomainError::SelfTarget.is_business_rule());
        assert!(!DomainError::SelfTarget.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::JurisdictionRequired {
            tier: Tier::Lga,
            level: Level::Lga,
        };
        assert_eq!(err.to_string(), "A LGA seat requires a LGA jurisdiction");

        let err = DomainError::invalid_transition("report", "DRAFT", "APPROVED");
        assert_eq!(err.to_string(), "Cannot move report from DRAFT to APPROVED");
    }
}
