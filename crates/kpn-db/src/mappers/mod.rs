//! Model to entity mappers
//!
//! Rows store every enum in its text form, so conversion back into domain
//! entities is fallible: `TryFrom<Model> for Entity` rejects a column whose
//! text no longer names a variant.

mod audit;
mod catalog;
mod content;
mod disciplinary;
mod member;
mod report;

use kpn_core::error::DomainError;
use kpn_core::Snowflake;

/// Parse a text column, naming the column in the error
pub(crate) fn decode<T>(
    column: &'static str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, DomainError> {
    parse(value)
        .ok_or_else(|| DomainError::DatabaseError(format!("unrecognised {column} value '{value}'")))
}

#[inline]
pub(crate) fn snowflake(id: Option<i64>) -> Option<Snowflake> {
    id.map(Snowflake::new)
}

#[inline]
pub(crate) fn raw(id: Option<Snowflake>) -> Option<i64> {
    id.map(Snowflake::into_inner)
}
