//! Campaign and media publishing
//!
//! Authors write drafts and send them for review. The publisher seat and
//! the top seat skip review: their submissions publish at once and are
//! marked auto-approved.

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument};

use kpn_core::events::ContentDecidedEvent;
use kpn_core::governance::require;
use kpn_core::{
    AuditKind, Capabilities, ContentItem, DomainError, DomainEvent, PublishState, Snowflake,
};

use crate::dto::{ContentResponse, CreateContentRequest, EditContentRequest, RejectRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Content service
pub struct ContentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ContentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn create(&self, author_id: Snowflake, request: CreateContentRequest) -> ServiceResult<ContentResponse> {
        let (author, position) = self.ctx.acting(author_id).await?;
        if !author.is_approved() {
            return Err(DomainError::PermissionDenied("only approved members may author content".into()).into());
        }
        require(&position, Capabilities::AUTHOR_CONTENT, "author content")?;

        let item = ContentItem::new(
            self.ctx.generate_id(),
            request.kind,
            author_id,
            request.title.trim(),
            request.body,
        );
        let audit = self
            .ctx
            .audit(AuditKind::ContentCreated, Some(author_id), author_id)
            .with_change(&Value::Null, &item.publish_state)
            .with_reason(Some(format!("{} \"{}\"", item.kind, item.title)));
        self.ctx.content_repo().create(&item, &audit).await?;

        info!(content_id = %item.id, author = %author_id, "Content drafted");
        Ok(ContentResponse::from(&item))
    }

    /// Edit a draft or a rejected item; rejected items return to DRAFT
    #[instrument(skip(self, request))]
    pub async fn edit(
        &self,
        author_id: Snowflake,
        content_id: Snowflake,
        request: EditContentRequest,
    ) -> ServiceResult<ContentResponse> {
        let mut item = self.owned(author_id, content_id).await?;
        let previous = item.publish_state;
        item.edit(request.title.map(|t| t.trim().to_string()), request.body)?;

        let audit = self
            .ctx
            .audit(AuditKind::ContentEdited, Some(author_id), author_id)
            .with_change(&previous, &item.publish_state)
            .with_reason(Some(format!("{} \"{}\"", item.kind, item.title)));
        self.ctx.content_repo().update(&item, previous, Some(&audit)).await?;

        info!(content_id = %content_id, "Content edited");
        Ok(ContentResponse::from(&item))
    }

    /// Send a draft for review, or publish it straight away from the
    /// publisher or top seat
    #[instrument(skip(self))]
    pub async fn submit(&self, author_id: Snowflake, content_id: Snowflake) -> ServiceResult<ContentResponse> {
        let mut item = self.owned(author_id, content_id).await?;
        let author = self.ctx.member(author_id).await?;

        let published = self.ctx.catalog().can_publish(&author);
        let kind = if published {
            item.auto_publish(author_id)?;
            AuditKind::ContentPublished
        } else {
            item.submit()?;
            AuditKind::ContentSubmitted
        };

        let audit = self
            .ctx
            .audit(kind, Some(author_id), author_id)
            .with_change(&PublishState::Draft, &item.publish_state)
            .with_reason(Some(format!("{} \"{}\"", item.kind, item.title)));

        self.ctx
            .content_repo()
            .update(&item, PublishState::Draft, Some(&audit))
            .await?;

        if published {
            info!(content_id = %content_id, "Content auto-published");
            self.notify(&item, author_id, true).await;
        } else {
            info!(content_id = %content_id, "Content submitted for review");
        }

        Ok(ContentResponse::from(&item))
    }

    /// Publish a pending item
    #[instrument(skip(self))]
    pub async fn approve(&self, approver_id: Snowflake, content_id: Snowflake) -> ServiceResult<ContentResponse> {
        self.publisher(approver_id).await?;
        let mut item = self.find(content_id).await?;
        item.approve(approver_id)?;

        let audit = self
            .ctx
            .audit(AuditKind::ContentPublished, Some(approver_id), item.author_id)
            .with_change(&PublishState::Pending, &item.publish_state);
        self.ctx
            .content_repo()
            .update(&item, PublishState::Pending, Some(&audit))
            .await?;

        info!(content_id = %content_id, approver = %approver_id, "Content published");
        self.notify(&item, approver_id, true).await;

        Ok(ContentResponse::from(&item))
    }

    /// Send a pending item back to its author
    #[instrument(skip(self, request))]
    pub async fn reject(
        &self,
        approver_id: Snowflake,
        content_id: Snowflake,
        request: RejectRequest,
    ) -> ServiceResult<ContentResponse> {
        self.publisher(approver_id).await?;
        let mut item = self.find(content_id).await?;
        item.reject(approver_id, request.reason.trim())?;

        let audit = self
            .ctx
            .audit(AuditKind::ContentRejected, Some(approver_id), item.author_id)
            .with_change(&PublishState::Pending, &item.publish_state)
            .with_reason(item.rejection_reason.clone());
        self.ctx
            .content_repo()
            .update(&item, PublishState::Pending, Some(&audit))
            .await?;

        info!(content_id = %content_id, approver = %approver_id, "Content rejected");
        self.notify(&item, approver_id, false).await;

        Ok(ContentResponse::from(&item))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, content_id: Snowflake) -> ServiceResult<ContentResponse> {
        let item = self.find(content_id).await?;
        Ok(ContentResponse::from(&item))
    }

    /// Review queue; visible to publishers only
    #[instrument(skip(self))]
    pub async fn list_pending(&self, viewer_id: Snowflake) -> ServiceResult<Vec<ContentResponse>> {
        self.publisher(viewer_id).await?;
        let items = self.ctx.content_repo().list_by_state(PublishState::Pending).await?;
        Ok(items.iter().map(ContentResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_by_author(&self, author_id: Snowflake) -> ServiceResult<Vec<ContentResponse>> {
        let items = self.ctx.content_repo().list_by_author(author_id).await?;
        Ok(items.iter().map(ContentResponse::from).collect())
    }

    async fn find(&self, content_id: Snowflake) -> ServiceResult<ContentItem> {
        self.ctx
            .content_repo()
            .find_by_id(content_id)
            .await?
            .ok_or_else(|| DomainError::ContentNotFound(content_id).into())
    }

    async fn owned(&self, author_id: Snowflake, content_id: Snowflake) -> ServiceResult<ContentItem> {
        let item = self.find(content_id).await?;
        if item.author_id != author_id {
            return Err(DomainError::PermissionDenied("only the author may change this item".into()).into());
        }
        Ok(item)
    }

    async fn publisher(&self, member_id: Snowflake) -> ServiceResult<()> {
        let member = self.ctx.member(member_id).await?;
        if !self.ctx.catalog().can_publish(&member) {
            return Err(DomainError::UnauthorizedApprover(member_id).into());
        }
        Ok(())
    }

    async fn notify(&self, item: &ContentItem, decided_by: Snowflake, published: bool) {
        self.ctx
            .notify(DomainEvent::ContentDecided(ContentDecidedEvent {
                content_id: item.id,
                author_id: item.author_id,
                decided_by,
                published,
                auto_approved: item.auto_approved,
                timestamp: Utc::now(),
            }))
            .await;
    }
}
