//! Content item database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for content_items table
#[derive(Debug, Clone, FromRow)]
pub struct ContentItemModel {
    pub id: i64,
    pub kind: String,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub publish_state: String,
    pub approver_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub auto_approved: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
