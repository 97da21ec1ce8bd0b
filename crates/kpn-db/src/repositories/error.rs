//! Error handling and shared write helpers for repositories

use kpn_core::entities::{AuditEntry, StatusChange};
use kpn_core::error::DomainError;
use kpn_core::traits::RepoResult;
use kpn_core::value_objects::Snowflake;
use sqlx::{Error as SqlxError, PgConnection};

use crate::mappers::raw;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "seat occupied" error for a (seat, jurisdiction) key
pub fn seat_occupied(seat_id: Option<Snowflake>, jurisdiction_id: Option<Snowflake>) -> DomainError {
    DomainError::SeatOccupied {
        seat_id: seat_id.unwrap_or_default(),
        jurisdiction_id,
    }
}

/// Append an audit entry on the caller's connection or transaction
pub(crate) async fn insert_audit(conn: &mut PgConnection, entry: &AuditEntry) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_entries (
            id, action_kind, performed_by_id, target_member_id,
            before_snapshot, after_snapshot, reason, auto_generated, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(entry.id.into_inner())
    .bind(entry.action_kind.as_str())
    .bind(raw(entry.performed_by_id))
    .bind(entry.target_member_id.into_inner())
    .bind(&entry.before_snapshot)
    .bind(&entry.after_snapshot)
    .bind(entry.reason.as_deref())
    .bind(entry.auto_generated)
    .bind(entry.created_at)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

/// Apply a status change to a member inside the caller's transaction
///
/// Returns `false` when the guard status no longer matches and nothing was
/// written.
pub(crate) async fn apply_effect(conn: &mut PgConnection, change: &StatusChange) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE members
        SET approval_status = $2,
            seat_id = CASE WHEN $3 THEN NULL ELSE seat_id END,
            jurisdiction_id = CASE WHEN $3 THEN NULL ELSE jurisdiction_id END,
            updated_at = NOW()
        WHERE id = $1 AND ($4::text IS NULL OR approval_status = $4)
        "#,
    )
    .bind(change.member_id.into_inner())
    .bind(change.status.as_str())
    .bind(change.vacates())
    .bind(change.expected.map(|status| status.as_str()))
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.rows_affected() > 0)
}
