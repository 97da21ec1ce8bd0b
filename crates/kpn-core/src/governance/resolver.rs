//! Approval chain resolver
//!
//! Pure functions deciding who may approve, discipline or admit whom. The
//! same rules back dismissal approval, member approval and disciplinary
//! issuance, so no service re-derives them.

use serde::Serialize;

use crate::error::DomainError;
use crate::value_objects::{DisciplinaryType, Rung, Snowflake, Tier};

use super::catalog::JurisdictionTree;

/// A member's authority at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub member_id: Snowflake,
    pub rung: Rung,
    pub jurisdiction_id: Option<Snowflake>,
    /// Sits in a protected seat
    pub protected: bool,
}

impl Position {
    #[inline]
    pub fn is_top(&self) -> bool {
        self.rung == Rung::Top
    }
}

/// Who must sign off on an action raised by a given issuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApprovalRoute {
    pub rung: Rung,
    /// Node the approver must hold; absent for state-wide approvers
    pub jurisdiction_id: Option<Snowflake>,
}

/// Rung whose holder approves actions raised by `issuer`
///
/// `None` means no approval is needed. A GENERAL issuer cannot raise
/// sensitive actions at all, so it is routed to the top seat.
pub fn required_approver_tier(issuer: Rung) -> Option<Rung> {
    match issuer {
        Rung::Top => None,
        Rung::Ward => Some(Rung::Lga),
        Rung::Lga => Some(Rung::Zonal),
        Rung::Zonal => Some(Rung::StateExecutive),
        Rung::StateExecutive | Rung::General => Some(Rung::Top),
    }
}

/// Resolve the approver rung and the node it must hold
pub fn approval_route(tree: &JurisdictionTree, issuer: &Position) -> Option<ApprovalRoute> {
    let rung = required_approver_tier(issuer.rung)?;
    let jurisdiction_id = match (rung.scope(), issuer.jurisdiction_id) {
        (Some(level), Some(issuer_j)) => tree
            .ancestor_at(issuer_j, level)
            .ok()
            .flatten()
            .map(|node| node.id),
        _ => None,
    };
    Some(ApprovalRoute {
        rung,
        jurisdiction_id,
    })
}

/// Whether `candidate` may approve an action raised by `issuer`
///
/// The top seat may always approve. Otherwise the candidate's rung must be
/// exactly the required one, and LGA or ZONAL approvers must hold the node
/// above the issuer at their own level.
pub fn can_approve(tree: &JurisdictionTree, candidate: &Position, issuer: &Position) -> bool {
    if candidate.is_top() {
        return true;
    }
    let Some(required) = required_approver_tier(issuer.rung) else {
        return false;
    };
    if candidate.rung != required {
        return false;
    }

    match required.scope() {
        Some(level) => {
            let (Some(issuer_j), Some(candidate_j)) = (issuer.jurisdiction_id, candidate.jurisdiction_id)
            else {
                return false;
            };
            matches!(
                tree.ancestor_at(issuer_j, level),
                Ok(Some(node)) if node.id == candidate_j
            )
        }
        None => true,
    }
}

/// Whether `actor` has authority over a member bound to `target_j`
///
/// State-wide rungs cover everything; scoped rungs cover their own subtree;
/// GENERAL covers nothing.
pub fn covers(tree: &JurisdictionTree, actor: &Position, target_j: Option<Snowflake>) -> bool {
    match actor.rung {
        Rung::Top | Rung::StateExecutive => true,
        Rung::General => false,
        Rung::Ward | Rung::Lga | Rung::Zonal => match (actor.jurisdiction_id, target_j) {
            (Some(actor_j), Some(target_j)) => tree.same_or_ancestor(actor_j, target_j).unwrap_or(false),
            _ => false,
        },
    }
}

/// Check that `issuer` may raise `action` against `target`
pub fn can_discipline(
    tree: &JurisdictionTree,
    issuer: &Position,
    target: &Position,
    action: DisciplinaryType,
) -> Result<(), DomainError> {
    if issuer.member_id == target.member_id {
        return Err(DomainError::SelfTarget);
    }
    if issuer.is_top() {
        return Ok(());
    }
    if target.protected && action == DisciplinaryType::Dismissal {
        return Err(DomainError::ProtectedRole(target.member_id));
    }
    if issuer.rung <= target.rung {
        return Err(DomainError::PermissionDenied(format!(
            "a {} member cannot discipline a {} member",
            issuer.rung, target.rung
        )));
    }
    if !covers(tree, issuer, target.jurisdiction_id) {
        return Err(DomainError::PermissionDenied(
            "target is outside the issuer's jurisdiction".into(),
        ));
    }
    Ok(())
}

/// Whether `actor` may admit an applicant requesting `tier` at `applicant_j`
///
/// Each leadership rung admits applicants one tier below it, inside its own
/// subtree; STATE applicants need the top seat.
pub fn can_approve_member(
    tree: &JurisdictionTree,
    actor: &Position,
    tier: Tier,
    applicant_j: Option<Snowflake>,
) -> bool {
    match (actor.rung, tier) {
        (Rung::Top, _) => true,
        (Rung::StateExecutive, Tier::Zonal) => true,
        (Rung::Zonal, Tier::Lga) | (Rung::Lga, Tier::Ward) | (Rung::Ward, Tier::General) => {
            covers(tree, actor, applicant_j)
        }
        _ => false,
    }
}
