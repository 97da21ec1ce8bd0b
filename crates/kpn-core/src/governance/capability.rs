//! Capability table keyed by rung
//!
//! The table answers "may this kind of member do this kind of thing at all".
//! Target-specific checks (coverage, outranking, protection) live in the
//! resolver and run after the gate passes.

use crate::error::DomainError;
use crate::value_objects::{Capabilities, Rung};

use super::resolver::Position;

const GENERAL: Capabilities = Capabilities::AUTHOR_CONTENT;

const WARD: Capabilities = GENERAL
    .union(Capabilities::SUBMIT_REPORTS)
    .union(Capabilities::ISSUE_DISCIPLINE)
    .union(Capabilities::RECORD_DUTY)
    .union(Capabilities::APPROVE_MEMBERS);

const LGA: Capabilities = WARD.union(Capabilities::REVIEW_REPORTS);

const ZONAL: Capabilities = LGA;

const STATE_EXECUTIVE: Capabilities = ZONAL.union(Capabilities::RESOLVE_DISCIPLINE);

pub const CAPABILITY_TABLE: [(Rung, Capabilities); 6] = [
    (Rung::General, GENERAL),
    (Rung::Ward, WARD),
    (Rung::Lga, LGA),
    (Rung::Zonal, ZONAL),
    (Rung::StateExecutive, STATE_EXECUTIVE),
    (Rung::Top, Capabilities::all()),
];

pub fn capabilities_for(rung: Rung) -> Capabilities {
    CAPABILITY_TABLE
        .iter()
        .find(|(r, _)| *r == rung)
        .map(|(_, caps)| *caps)
        .unwrap_or(GENERAL)
}

/// Fail with `PermissionDenied` unless `actor` carries `capability`
pub fn require(actor: &Position, capability: Capabilities, operation: &str) -> Result<(), DomainError> {
    if capabilities_for(actor.rung).has(capability) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied(format!(
            "a {} member may not {operation}",
            actor.rung
        )))
    }
}
