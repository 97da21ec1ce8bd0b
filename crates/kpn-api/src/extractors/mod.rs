//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, query strings and path IDs.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::AuthMember;
pub use path::IdPath;
pub use query::QueryParams;
pub use validated::{OptionalValidatedJson, ValidatedJson};
