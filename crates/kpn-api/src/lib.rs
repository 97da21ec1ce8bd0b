//! # kpn-api
//!
//! REST surface of the governance engine, built with Axum. Every route
//! under `/api/v1` except member registration and the catalog reads
//! requires a bearer token naming the acting member.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, issue_token, run, TokenSubject};
pub use state::AppState;
