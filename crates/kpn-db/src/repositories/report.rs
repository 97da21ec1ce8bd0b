//! PostgreSQL implementation of ReportRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use kpn_core::entities::{AuditEntry, Report};
use kpn_core::error::DomainError;
use kpn_core::traits::{ReportRepository, RepoResult};
use kpn_core::value_objects::{ReportStatus, Snowflake};

use crate::mappers::raw;
use crate::models::ReportModel;

use super::error::{insert_audit, map_db_error, map_unique_violation};

macro_rules! report_columns {
    () => {
        "id, tier_path, submitted_by_id, submitted_to_id, origin_jurisdiction_id, title, content, \
         period, status, parent_report_id, deadline, is_reviewed, reviewed_by_id, review_notes, \
         escalation_pending, created_at, submitted_at, reviewed_at, escalated_at"
    };
}

/// PostgreSQL implementation of ReportRepository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(conn: &mut PgConnection, report: &Report) -> RepoResult<()> {
        sqlx::query(concat!(
            "INSERT INTO reports (",
            report_columns!(),
            ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)"
        ))
        .bind(report.id.into_inner())
        .bind(report.tier_path.as_str())
        .bind(report.submitted_by_id.into_inner())
        .bind(raw(report.submitted_to_id))
        .bind(report.origin_jurisdiction_id.into_inner())
        .bind(&report.title)
        .bind(&report.content)
        .bind(&report.period)
        .bind(report.status.as_str())
        .bind(raw(report.parent_report_id))
        .bind(report.deadline)
        .bind(report.is_reviewed)
        .bind(raw(report.reviewed_by_id))
        .bind(report.review_notes.as_deref())
        .bind(report.escalation_pending)
        .bind(report.created_at)
        .bind(report.submitted_at)
        .bind(report.reviewed_at)
        .bind(report.escalated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            map_unique_violation(e, || match report.parent_report_id {
                Some(parent) => DomainError::AlreadyEscalated(parent),
                None => DomainError::ValidationError(format!("report {} already exists", report.id)),
            })
        })?;

        Ok(())
    }

    async fn list_where(&self, column_filter: &'static str, member_id: Snowflake) -> RepoResult<Vec<Report>> {
        let sql = format!(
            "SELECT {} FROM reports WHERE {column_filter} = $1 ORDER BY created_at DESC, id DESC",
            report_columns!()
        );
        let rows = sqlx::query_as::<_, ReportModel>(&sql)
            .bind(member_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(Report::try_from).collect()
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportModel>(concat!(
            "SELECT ",
            report_columns!(),
            " FROM reports WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Report::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_submitted_to(&self, member_id: Snowflake) -> RepoResult<Vec<Report>> {
        self.list_where("submitted_to_id", member_id).await
    }

    #[instrument(skip(self))]
    async fn list_submitted_by(&self, member_id: Snowflake) -> RepoResult<Vec<Report>> {
        self.list_where("submitted_by_id", member_id).await
    }

    #[instrument(skip(self))]
    async fn find_children(&self, report_id: Snowflake) -> RepoResult<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportModel>(concat!(
            "SELECT ",
            report_columns!(),
            " FROM reports WHERE parent_report_id = $1 ORDER BY created_at, id"
        ))
        .bind(report_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Report::try_from).collect()
    }

    #[instrument(skip(self, report, audit), fields(report_id = %report.id))]
    async fn create(&self, report: &Report, audit: Option<&AuditEntry>) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        Self::insert(&mut tx, report).await?;
        if let Some(audit) = audit {
            insert_audit(&mut tx, audit).await?;
        }
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, report, audit), fields(report_id = %report.id))]
    async fn update(
        &self,
        report: &Report,
        expected: ReportStatus,
        audit: &AuditEntry,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET submitted_to_id = $3,
                status = $4,
                is_reviewed = $5,
                reviewed_by_id = $6,
                review_notes = $7,
                escalation_pending = $8,
                submitted_at = $9,
                reviewed_at = $10,
                escalated_at = $11
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(report.id.into_inner())
        .bind(expected.as_str())
        .bind(raw(report.submitted_to_id))
        .bind(report.status.as_str())
        .bind(report.is_reviewed)
        .bind(raw(report.reviewed_by_id))
        .bind(report.review_notes.as_deref())
        .bind(report.escalation_pending)
        .bind(report.submitted_at)
        .bind(report.reviewed_at)
        .bind(report.escalated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::invalid_transition("report", expected, report.status));
        }

        insert_audit(&mut tx, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, parent, child, audit), fields(parent_id = %parent.id, child_id = %child.id))]
    async fn escalate(&self, parent: &Report, child: &Report, audit: &AuditEntry) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = 'ESCALATED', escalation_pending = FALSE, escalated_at = $2
            WHERE id = $1 AND status = 'APPROVED' AND escalated_at IS NULL
            "#,
        )
        .bind(parent.id.into_inner())
        .bind(parent.escalated_at.unwrap_or(child.created_at))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AlreadyEscalated(parent.id));
        }

        Self::insert(&mut tx, child).await?;
        insert_audit(&mut tx, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, audit))]
    async fn mark_escalation_pending(&self, report_id: Snowflake, audit: &AuditEntry) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET escalation_pending = TRUE
            WHERE id = $1 AND status = 'APPROVED' AND escalated_at IS NULL
            "#,
        )
        .bind(report_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AlreadyEscalated(report_id));
        }

        insert_audit(&mut tx, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
