//! Integration test utilities for the governance API
//!
//! Spawns the real router over the in-memory backend and drives it with
//! reqwest.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
