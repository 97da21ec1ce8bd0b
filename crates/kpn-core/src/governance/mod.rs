//! Pure engine rules: catalog lookups, approval resolution, capabilities
//! and standing

pub mod capability;
pub mod catalog;
pub mod resolver;
pub mod standing;

pub use capability::{capabilities_for, require, CAPABILITY_TABLE};
pub use catalog::{Catalog, JurisdictionTree, SeatCatalog};
pub use resolver::{
    approval_route, can_approve, can_approve_member, can_discipline, covers,
    required_approver_tier, ApprovalRoute, Position,
};
pub use standing::{fold_standing, recompute_standing, StandingInputs};
