//! PostgreSQL implementation of AuditRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use kpn_core::entities::AuditEntry;
use kpn_core::traits::{AuditRepository, RepoResult};
use kpn_core::value_objects::Snowflake;

use crate::models::AuditEntryModel;

use super::error::{insert_audit, map_db_error};

/// PostgreSQL implementation of AuditRepository
#[derive(Clone)]
pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    #[instrument(skip(self, entry), fields(kind = %entry.action_kind))]
    async fn append(&self, entry: &AuditEntry) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        insert_audit(&mut conn, entry).await
    }

    #[instrument(skip(self))]
    async fn list_for_member(
        &self,
        member_id: Snowflake,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditEntryModel>(
            r#"
            SELECT id, action_kind, performed_by_id, target_member_id,
                   before_snapshot, after_snapshot, reason, auto_generated, created_at
            FROM audit_entries
            WHERE (target_member_id = $1 OR performed_by_id = $1) AND created_at >= $2
            ORDER BY created_at, id
            "#,
        )
        .bind(member_id.into_inner())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn list_by_target(&self, member_id: Snowflake, limit: i64) -> RepoResult<Vec<AuditEntry>> {
        let limit = limit.clamp(1, 1000);

        let rows = sqlx::query_as::<_, AuditEntryModel>(
            r#"
            SELECT id, action_kind, performed_by_id, target_member_id,
                   before_snapshot, after_snapshot, reason, auto_generated, created_at
            FROM audit_entries
            WHERE target_member_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(member_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }
}
