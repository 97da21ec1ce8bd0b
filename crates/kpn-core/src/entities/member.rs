//! Member entity - a registered member and its seat binding

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ApprovalStatus, Snowflake, Standing, Tier};

/// Organization member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Snowflake,
    pub full_name: String,
    pub role_tier: Tier,
    pub seat_id: Option<Snowflake>,
    pub jurisdiction_id: Option<Snowflake>,
    pub approval_status: ApprovalStatus,
    /// Cached result of the last standing recomputation
    pub missed_duty_count: i32,
    pub ignored_reminder_count: i32,
    pub computed_standing: Standing,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a PENDING registration
    pub fn new(
        id: Snowflake,
        full_name: impl Into<String>,
        role_tier: Tier,
        jurisdiction_id: Option<Snowflake>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            full_name: full_name.into(),
            role_tier,
            seat_id: None,
            jurisdiction_id,
            approval_status: ApprovalStatus::Pending,
            missed_duty_count: 0,
            ignored_reminder_count: 0,
            computed_standing: Standing::Active,
            last_activity_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Request a seat at registration time
    pub fn with_seat(mut self, seat_id: Snowflake) -> Self {
        self.seat_id = Some(seat_id);
        self
    }

    #[inline]
    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }

    #[inline]
    pub fn holds_seat(&self) -> bool {
        self.seat_id.is_some()
    }

    /// Whether this member currently blocks its (seat, jurisdiction) key
    #[inline]
    pub fn occupies_seat(&self) -> bool {
        self.holds_seat() && self.approval_status.occupies_seat()
    }

    /// Fail unless the member still has the status a placement was planned against
    pub fn ensure_status(&self, expected: ApprovalStatus) -> Result<(), DomainError> {
        if self.approval_status != expected {
            return Err(DomainError::invalid_transition("member", self.approval_status, "REPOSITIONED"));
        }
        Ok(())
    }

    /// Only approved, seated members can trade places
    pub fn ensure_swappable(&self) -> Result<(), DomainError> {
        self.ensure_status(ApprovalStatus::Approved)?;
        if !self.holds_seat() {
            return Err(DomainError::ValidationError(format!(
                "member {} does not occupy a seat",
                self.id
            )));
        }
        Ok(())
    }

    pub fn placement(&self) -> Placement {
        Placement {
            role_tier: self.role_tier,
            seat_id: self.seat_id,
            jurisdiction_id: self.jurisdiction_id,
        }
    }

    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            role_tier: self.role_tier,
            seat_id: self.seat_id,
            jurisdiction_id: self.jurisdiction_id,
            approval_status: self.approval_status,
        }
    }

    /// Apply a placement in place
    pub fn place(&mut self, placement: &Placement) {
        self.role_tier = placement.role_tier;
        self.seat_id = placement.seat_id;
        self.jurisdiction_id = placement.jurisdiction_id;
        self.updated_at = Utc::now();
    }

    /// Clear seat and jurisdiction; approval status is untouched
    pub fn vacate(&mut self) {
        if self.seat_id.is_some() || self.jurisdiction_id.is_some() {
            self.seat_id = None;
            self.jurisdiction_id = None;
            self.updated_at = Utc::now();
        }
    }

    pub fn set_status(&mut self, status: ApprovalStatus) {
        self.approval_status = status;
        if status.is_terminal_negative() {
            self.seat_id = None;
            self.jurisdiction_id = None;
        }
        self.updated_at = Utc::now();
    }
}

/// Where a member sits: the three fields every seat move rewrites together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub role_tier: Tier,
    pub seat_id: Option<Snowflake>,
    pub jurisdiction_id: Option<Snowflake>,
}

impl Placement {
    pub fn seated(role_tier: Tier, seat_id: Snowflake, jurisdiction_id: Option<Snowflake>) -> Self {
        Self {
            role_tier,
            seat_id: Some(seat_id),
            jurisdiction_id,
        }
    }

    pub fn unseated(role_tier: Tier) -> Self {
        Self {
            role_tier,
            seat_id: None,
            jurisdiction_id: None,
        }
    }
}

/// Before/after image recorded in audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub role_tier: Tier,
    pub seat_id: Option<Snowflake>,
    pub jurisdiction_id: Option<Snowflake>,
    pub approval_status: ApprovalStatus,
}

/// Approval status change applied to a member, optionally guarded by the
/// status it must currently have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub member_id: Snowflake,
    pub expected: Option<ApprovalStatus>,
    pub status: ApprovalStatus,
}

impl StatusChange {
    pub fn new(member_id: Snowflake, status: ApprovalStatus) -> Self {
        Self {
            member_id,
            expected: None,
            status,
        }
    }

    pub fn from_status(mut self, expected: ApprovalStatus) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Terminal negative statuses always release the seat
    #[inline]
    pub fn vacates(&self) -> bool {
        self.status.is_terminal_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ward_leader() -> Member {
        Member::new(Snowflake::new(1), "Amina Bello", Tier::Ward, Some(Snowflake::new(40)))
            .with_seat(Snowflake::new(9))
    }

    #[test]
    fn test_new_member_is_pending() {
        let member = ward_leader();
        assert_eq!(member.approval_status, ApprovalStatus::Pending);
        assert!(member.holds_seat());
        assert!(!member.occupies_seat());
        assert_eq!(member.computed_standing, Standing::Active);
    }

    #[test]
    fn test_dismissal_vacates_seat() {
        let mut member = ward_leader();
        member.set_status(ApprovalStatus::Approved);
        assert!(member.occupies_seat());

        member.set_status(ApprovalStatus::Dismissed);
        assert!(member.seat_id.is_none());
        assert!(member.jurisdiction_id.is_none());
        assert_eq!(member.role_tier, Tier::Ward);
    }

    #[test]
    fn test_suspension_keeps_seat() {
        let mut member = ward_leader();
        member.set_status(ApprovalStatus::Suspended);
        assert!(member.occupies_seat());
    }

    #[test]
    fn test_place_and_vacate() {
        let mut member = ward_leader();
        let target = Placement::seated(Tier::Lga, Snowflake::new(20), Some(Snowflake::new(30)));
        member.place(&target);
        assert_eq!(member.placement(), target);

        member.vacate();
        assert_eq!(member.placement(), Placement::unseated(Tier::Lga));
    }

    #[test]
    fn test_dismissed_member_is_not_swappable() {
        let mut member = ward_leader();
        member.set_status(ApprovalStatus::Approved);
        assert!(member.ensure_swappable().is_ok());

        member.set_status(ApprovalStatus::Dismissed);
        let err = member.ensure_swappable().unwrap_err();
        assert_eq!(err.code(), "INVALID_TRANSITION");
        assert!(member.ensure_status(ApprovalStatus::Approved).is_err());
    }

    #[test]
    fn test_unseated_member_is_not_swappable() {
        let mut member = Member::new(Snowflake::new(2), "Musa Jega", Tier::Lga, None);
        member.set_status(ApprovalStatus::Approved);
        assert_eq!(member.ensure_swappable().unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_status_change_vacates_only_on_terminal() {
        let id = Snowflake::new(1);
        assert!(StatusChange::new(id, ApprovalStatus::Dismissed).vacates());
        assert!(!StatusChange::new(id, ApprovalStatus::Suspended).vacates());
        let change = StatusChange::new(id, ApprovalStatus::Approved).from_status(ApprovalStatus::Pending);
        assert_eq!(change.expected, Some(ApprovalStatus::Pending));
    }
}
