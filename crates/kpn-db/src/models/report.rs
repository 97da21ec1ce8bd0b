//! Report database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reports table
#[derive(Debug, Clone, FromRow)]
pub struct ReportModel {
    pub id: i64,
    pub tier_path: String,
    pub submitted_by_id: i64,
    pub submitted_to_id: Option<i64>,
    pub origin_jurisdiction_id: i64,
    pub title: String,
    pub content: String,
    pub period: String,
    pub status: String,
    pub parent_report_id: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_reviewed: bool,
    pub reviewed_by_id: Option<i64>,
    pub review_notes: Option<String>,
    pub escalation_pending: bool,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub escalated_at: Option<DateTime<Utc>>,
}
