//! PostgreSQL implementation of ContentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use kpn_core::entities::{AuditEntry, ContentItem};
use kpn_core::error::DomainError;
use kpn_core::traits::{ContentRepository, RepoResult};
use kpn_core::value_objects::{PublishState, Snowflake};

use crate::mappers::raw;
use crate::models::ContentItemModel;

use super::error::{insert_audit, map_db_error};

macro_rules! content_columns {
    () => {
        "id, kind, author_id, title, body, publish_state, approver_id, rejection_reason, \
         auto_approved, published_at, created_at, updated_at"
    };
}

/// PostgreSQL implementation of ContentRepository
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ContentItem>> {
        let row = sqlx::query_as::<_, ContentItemModel>(concat!(
            "SELECT ",
            content_columns!(),
            " FROM content_items WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(ContentItem::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_state(&self, state: PublishState) -> RepoResult<Vec<ContentItem>> {
        let rows = sqlx::query_as::<_, ContentItemModel>(concat!(
            "SELECT ",
            content_columns!(),
            " FROM content_items WHERE publish_state = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(state.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ContentItem::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn list_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<ContentItem>> {
        let rows = sqlx::query_as::<_, ContentItemModel>(concat!(
            "SELECT ",
            content_columns!(),
            " FROM content_items WHERE author_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(author_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ContentItem::try_from).collect()
    }

    #[instrument(skip(self, item, audit), fields(content_id = %item.id))]
    async fn create(&self, item: &ContentItem, audit: &AuditEntry) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(concat!(
            "INSERT INTO content_items (",
            content_columns!(),
            ") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
        ))
        .bind(item.id.into_inner())
        .bind(item.kind.as_str())
        .bind(item.author_id.into_inner())
        .bind(&item.title)
        .bind(&item.body)
        .bind(item.publish_state.as_str())
        .bind(raw(item.approver_id))
        .bind(item.rejection_reason.as_deref())
        .bind(item.auto_approved)
        .bind(item.published_at)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        insert_audit(&mut tx, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, item, audit), fields(content_id = %item.id))]
    async fn update(
        &self,
        item: &ContentItem,
        expected: PublishState,
        audit: Option<&AuditEntry>,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE content_items
            SET title = $3,
                body = $4,
                publish_state = $5,
                approver_id = $6,
                rejection_reason = $7,
                auto_approved = $8,
                published_at = $9,
                updated_at = $10
            WHERE id = $1 AND publish_state = $2
            "#,
        )
        .bind(item.id.into_inner())
        .bind(expected.as_str())
        .bind(&item.title)
        .bind(&item.body)
        .bind(item.publish_state.as_str())
        .bind(raw(item.approver_id))
        .bind(item.rejection_reason.as_deref())
        .bind(item.auto_approved)
        .bind(item.published_at)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::invalid_transition(
                "content",
                expected,
                item.publish_state,
            ));
        }

        if let Some(audit) = audit {
            insert_audit(&mut tx, audit).await?;
        }
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
