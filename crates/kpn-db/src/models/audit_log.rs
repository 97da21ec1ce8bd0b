//! Audit entry database model

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Database model for audit_entries table
#[derive(Debug, Clone, FromRow)]
pub struct AuditEntryModel {
    pub id: i64,
    /// `AuditKind` text form
    pub action_kind: String,
    pub performed_by_id: Option<i64>,
    pub target_member_id: i64,
    pub before_snapshot: JsonValue,
    pub after_snapshot: JsonValue,
    pub reason: Option<String>,
    pub auto_generated: bool,
    pub created_at: DateTime<Utc>,
}
