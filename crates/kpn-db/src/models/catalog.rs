//! Jurisdiction and seat database models

use sqlx::FromRow;

/// Database model for jurisdictions table
#[derive(Debug, Clone, FromRow)]
pub struct JurisdictionModel {
    pub id: i64,
    pub level: String,
    pub name: String,
    pub parent_id: Option<i64>,
}

/// Database model for seats table
#[derive(Debug, Clone, FromRow)]
pub struct SeatModel {
    pub id: i64,
    pub tier: String,
    pub title: String,
    pub seat_number: i32,
    /// `SeatFlags` bits
    pub flags: i64,
}
