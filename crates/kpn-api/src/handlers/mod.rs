//! Route handlers
//!
//! Thin adapters from HTTP onto the governance services, one module per
//! service.

pub mod catalog;
pub mod content;
pub mod disciplinary;
pub mod health;
pub mod members;
pub mod positions;
pub mod reports;
pub mod standing;
