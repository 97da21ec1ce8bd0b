//! Member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for members table
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub id: i64,
    pub full_name: String,
    pub role_tier: String,
    pub seat_id: Option<i64>,
    pub jurisdiction_id: Option<i64>,
    pub approval_status: String,
    pub missed_duty_count: i32,
    pub ignored_reminder_count: i32,
    pub computed_standing: String,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
