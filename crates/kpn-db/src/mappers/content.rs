//! Content item model -> entity

use kpn_core::entities::ContentItem;
use kpn_core::error::DomainError;
use kpn_core::{ContentKind, PublishState, Snowflake};

use super::{decode, snowflake};
use crate::models::ContentItemModel;

impl TryFrom<ContentItemModel> for ContentItem {
    type Error = DomainError;

    fn try_from(model: ContentItemModel) -> Result<Self, Self::Error> {
        Ok(ContentItem {
            id: Snowflake::new(model.id),
            kind: decode("content_items.kind", &model.kind, ContentKind::parse)?,
            author_id: Snowflake::new(model.author_id),
            title: model.title,
            body: model.body,
            publish_state: decode(
                "content_items.publish_state",
                &model.publish_state,
                PublishState::parse,
            )?,
            approver_id: snowflake(model.approver_id),
            rejection_reason: model.rejection_reason,
            auto_approved: model.auto_approved,
            published_at: model.published_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
