//! Disciplinary action entity and its state machine
//!
//! ```text
//! WARNING / REPRIMAND / SUSPENSION ─► ACTIVE ─resolve─► RESOLVED
//! DISMISSAL (top issuer)           ─► ACTIVE (approval APPROVED)
//! DISMISSAL (anyone else)          ─► PENDING_APPROVAL ─approve─► ACTIVE
//!                                                      └reject──► RESOLVED
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ActionApproval, ActionStatus, DisciplinaryType, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplinaryAction {
    pub id: Snowflake,
    pub target_member_id: Snowflake,
    pub issuer_member_id: Snowflake,
    pub action_type: DisciplinaryType,
    pub status: ActionStatus,
    pub approval_status: ActionApproval,
    pub approver_member_id: Option<Snowflake>,
    pub approval_notes: Option<String>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl DisciplinaryAction {
    /// Create an action in its initial state
    ///
    /// A dismissal issued from the top seat is self-approved; every other
    /// dismissal waits for an approver.
    pub fn issue(
        id: Snowflake,
        target_member_id: Snowflake,
        issuer_member_id: Snowflake,
        action_type: DisciplinaryType,
        reason: impl Into<String>,
        issuer_is_top: bool,
    ) -> Self {
        let now = Utc::now();
        let (status, approval_status, approver, approved_at) = match action_type {
            DisciplinaryType::Dismissal if issuer_is_top => (
                ActionStatus::Active,
                ActionApproval::Approved,
                Some(issuer_member_id),
                Some(now),
            ),
            DisciplinaryType::Dismissal => (
                ActionStatus::PendingApproval,
                ActionApproval::Pending,
                None,
                None,
            ),
            _ => (ActionStatus::Active, ActionApproval::NotRequired, None, None),
        };

        Self {
            id,
            target_member_id,
            issuer_member_id,
            action_type,
            status,
            approval_status,
            approver_member_id: approver,
            approval_notes: None,
            reason: reason.into(),
            created_at: now,
            approved_at,
            resolved_at: None,
        }
    }

    #[inline]
    pub fn is_dismissal(&self) -> bool {
        self.action_type == DisciplinaryType::Dismissal
    }

    #[inline]
    pub fn awaits_approval(&self) -> bool {
        self.approval_status == ActionApproval::Pending
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.status == ActionStatus::Resolved
    }

    pub fn approve(&mut self, approver: Snowflake, notes: Option<String>) -> Result<(), DomainError> {
        self.ensure_pending()?;
        let now = Utc::now();
        self.approval_status = ActionApproval::Approved;
        self.status = ActionStatus::Active;
        self.approver_member_id = Some(approver);
        self.approval_notes = notes;
        self.approved_at = Some(now);
        Ok(())
    }

    pub fn reject(&mut self, approver: Snowflake, notes: Option<String>) -> Result<(), DomainError> {
        self.ensure_pending()?;
        let now = Utc::now();
        self.approval_status = ActionApproval::Rejected;
        self.status = ActionStatus::Resolved;
        self.approver_member_id = Some(approver);
        self.approval_notes = notes;
        self.resolved_at = Some(now);
        Ok(())
    }

    /// Close a non-dismissal action
    pub fn resolve(&mut self) -> Result<(), DomainError> {
        if self.is_resolved() {
            return Err(DomainError::AlreadyResolved(self.id));
        }
        if self.is_dismissal() {
            return Err(DomainError::invalid_transition(
                "dismissal",
                self.status,
                ActionStatus::Resolved,
            ));
        }
        self.status = ActionStatus::Resolved;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.awaits_approval() {
            Ok(())
        } else {
            Err(DomainError::AlreadyResolved(self.id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(action_type: DisciplinaryType, top: bool) -> DisciplinaryAction {
        DisciplinaryAction::issue(
            Snowflake::new(1),
            Snowflake::new(10),
            Snowflake::new(20),
            action_type,
            "missed three ward meetings",
            top,
        )
    }

    #[test]
    fn test_initial_states() {
        let warning = issue(DisciplinaryType::Warning, false);
        assert_eq!(warning.status, ActionStatus::Active);
        assert_eq!(warning.approval_status, ActionApproval::NotRequired);

        let dismissal = issue(DisciplinaryType::Dismissal, false);
        assert_eq!(dismissal.status, ActionStatus::PendingApproval);
        assert!(dismissal.awaits_approval());

        let top_dismissal = issue(DisciplinaryType::Dismissal, true);
        assert_eq!(top_dismissal.status, ActionStatus::Active);
        assert_eq!(top_dismissal.approval_status, ActionApproval::Approved);
        assert_eq!(top_dismissal.approver_member_id, Some(Snowflake::new(20)));
    }

    #[test]
    fn test_approve_once() {
        let mut action = issue(DisciplinaryType::Dismissal, false);
        action.approve(Snowflake::new(30), Some("confirmed".into())).unwrap();
        assert_eq!(action.status, ActionStatus::Active);
        assert_eq!(action.approval_status, ActionApproval::Approved);
        assert!(action.approved_at.is_some());

        let err = action.approve(Snowflake::new(30), None).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyResolved(_)));
        let err = action.reject(Snowflake::new(30), None).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyResolved(_)));
    }

    #[test]
    fn test_reject_resolves() {
        let mut action = issue(DisciplinaryType::Dismissal, false);
        action.reject(Snowflake::new(30), Some("insufficient grounds".into())).unwrap();
        assert_eq!(action.status, ActionStatus::Resolved);
        assert_eq!(action.approval_status, ActionApproval::Rejected);
        assert!(action.resolved_at.is_some());
    }

    #[test]
    fn test_warning_cannot_be_approved() {
        let mut action = issue(DisciplinaryType::Warning, false);
        assert!(matches!(
            action.approve(Snowflake::new(30), None),
            Err(DomainError::AlreadyResolved(_))
        ));
    }

    #[test]
    fn test_resolve_rules() {
        let mut suspension = issue(DisciplinaryType::Suspension, false);
        suspension.resolve().unwrap();
        assert!(suspension.is_resolved());
        assert!(matches!(
            suspension.resolve(),
            Err(DomainError::AlreadyResolved(_))
        ));

        let mut dismissal = issue(DisciplinaryType::Dismissal, true);
        assert!(matches!(
            dismissal.resolve(),
            Err(DomainError::InvalidTransition { .. })
        ));
    }
}
