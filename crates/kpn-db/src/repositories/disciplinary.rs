//! PostgreSQL implementation of DisciplinaryRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use kpn_core::entities::{AuditEntry, DisciplinaryAction, StatusChange};
use kpn_core::error::DomainError;
use kpn_core::traits::{DisciplinaryRepository, RepoResult};
use kpn_core::value_objects::Snowflake;

use crate::mappers::raw;
use crate::models::DisciplinaryActionModel;

use super::error::{apply_effect, insert_audit, map_db_error};

macro_rules! action_columns {
    () => {
        "id, target_member_id, issuer_member_id, action_type, status, approval_status, \
         approver_member_id, approval_notes, reason, created_at, approved_at, resolved_at"
    };
}

/// PostgreSQL implementation of DisciplinaryRepository
#[derive(Clone)]
pub struct PgDisciplinaryRepository {
    pool: PgPool,
}

impl PgDisciplinaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the member effect and audit, then commit
    async fn finish(
        conn: &mut PgConnection,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        if let Some(change) = effect {
            if !apply_effect(conn, change).await? {
                debug!(member_id = %change.member_id, "Member status moved on; effect skipped");
            }
        }
        insert_audit(conn, audit).await
    }
}

#[async_trait]
impl DisciplinaryRepository for PgDisciplinaryRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<DisciplinaryAction>> {
        let row = sqlx::query_as::<_, DisciplinaryActionModel>(concat!(
            "SELECT ",
            action_columns!(),
            " FROM disciplinary_actions WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(DisciplinaryAction::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_target(&self, member_id: Snowflake) -> RepoResult<Vec<DisciplinaryAction>> {
        let rows = sqlx::query_as::<_, DisciplinaryActionModel>(concat!(
            "SELECT ",
            action_columns!(),
            " FROM disciplinary_actions WHERE target_member_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(DisciplinaryAction::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn list_pending(&self) -> RepoResult<Vec<DisciplinaryAction>> {
        let rows = sqlx::query_as::<_, DisciplinaryActionModel>(concat!(
            "SELECT ",
            action_columns!(),
            " FROM disciplinary_actions WHERE approval_status = 'PENDING' ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(DisciplinaryAction::try_from).collect()
    }

    #[instrument(skip(self, action, audit), fields(action_id = %action.id))]
    async fn create(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO disciplinary_actions (
                id, target_member_id, issuer_member_id, action_type, status, approval_status,
                approver_member_id, approval_notes, reason, created_at, approved_at, resolved_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(action.id.into_inner())
        .bind(action.target_member_id.into_inner())
        .bind(action.issuer_member_id.into_inner())
        .bind(action.action_type.as_str())
        .bind(action.status.as_str())
        .bind(action.approval_status.as_str())
        .bind(raw(action.approver_member_id))
        .bind(action.approval_notes.as_deref())
        .bind(&action.reason)
        .bind(action.created_at)
        .bind(action.approved_at)
        .bind(action.resolved_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        Self::finish(&mut tx, effect, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, action, audit), fields(action_id = %action.id))]
    async fn decide(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE disciplinary_actions
            SET status = $2,
                approval_status = $3,
                approver_member_id = $4,
                approval_notes = $5,
                approved_at = $6,
                resolved_at = $7
            WHERE id = $1 AND approval_status = 'PENDING'
            "#,
        )
        .bind(action.id.into_inner())
        .bind(action.status.as_str())
        .bind(action.approval_status.as_str())
        .bind(raw(action.approver_member_id))
        .bind(action.approval_notes.as_deref())
        .bind(action.approved_at)
        .bind(action.resolved_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AlreadyResolved(action.id));
        }

        Self::finish(&mut tx, effect, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, action, audit), fields(action_id = %action.id))]
    async fn resolve(
        &self,
        action: &DisciplinaryAction,
        effect: Option<&StatusChange>,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE disciplinary_actions
            SET status = $2, resolved_at = $3
            WHERE id = $1 AND status <> 'RESOLVED'
            "#,
        )
        .bind(action.id.into_inner())
        .bind(action.status.as_str())
        .bind(action.resolved_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AlreadyResolved(action.id));
        }

        Self::finish(&mut tx, effect, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
