//! Disciplinary action database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for disciplinary_actions table
#[derive(Debug, Clone, FromRow)]
pub struct DisciplinaryActionModel {
    pub id: i64,
    pub target_member_id: i64,
    pub issuer_member_id: i64,
    pub action_type: String,
    pub status: String,
    pub approval_status: String,
    pub approver_member_id: Option<i64>,
    pub approval_notes: Option<String>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}
