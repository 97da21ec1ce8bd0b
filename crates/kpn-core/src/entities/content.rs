//! Content item entity - campaigns and media share one approval flow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ContentKind, PublishState, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Snowflake,
    pub kind: ContentKind,
    pub author_id: Snowflake,
    pub title: String,
    pub body: String,
    pub publish_state: PublishState,
    pub approver_id: Option<Snowflake>,
    pub rejection_reason: Option<String>,
    /// Published by the publisher seat without a separate review step
    pub auto_approved: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn new(
        id: Snowflake,
        kind: ContentKind,
        author_id: Snowflake,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            author_id,
            title: title.into(),
            body: body.into(),
            publish_state: PublishState::Draft,
            approver_id: None,
            rejection_reason: None,
            auto_approved: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Edit a draft or a rejected item; a rejected item returns to DRAFT
    pub fn edit(&mut self, title: Option<String>, body: Option<String>) -> Result<(), DomainError> {
        match self.publish_state {
            PublishState::Draft | PublishState::Rejected => {}
            state => {
                return Err(DomainError::invalid_transition(
                    "content",
                    state,
                    PublishState::Draft,
                ))
            }
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        self.publish_state = PublishState::Draft;
        self.rejection_reason = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Send a draft for review
    pub fn submit(&mut self) -> Result<(), DomainError> {
        self.require(PublishState::Draft, PublishState::Pending)?;
        self.publish_state = PublishState::Pending;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Publish a draft in one step on behalf of the publisher seat
    ///
    /// `approver_id` and `published_at` are filled exactly as a reviewed
    /// approval would fill them; only `auto_approved` tells them apart.
    pub fn auto_publish(&mut self, publisher_id: Snowflake) -> Result<(), DomainError> {
        self.require(PublishState::Draft, PublishState::Published)?;
        self.mark_published(publisher_id);
        self.auto_approved = true;
        Ok(())
    }

    pub fn approve(&mut self, approver_id: Snowflake) -> Result<(), DomainError> {
        self.require(PublishState::Pending, PublishState::Published)?;
        self.mark_published(approver_id);
        Ok(())
    }

    pub fn reject(&mut self, approver_id: Snowflake, reason: impl Into<String>) -> Result<(), DomainError> {
        self.require(PublishState::Pending, PublishState::Rejected)?;
        self.publish_state = PublishState::Rejected;
        self.approver_id = Some(approver_id);
        self.rejection_reason = Some(reason.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.publish_state == PublishState::Published
    }

    fn mark_published(&mut self, approver_id: Snowflake) {
        let now = Utc::now();
        self.publish_state = PublishState::Published;
        self.approver_id = Some(approver_id);
        self.rejection_reason = None;
        self.published_at = Some(now);
        self.updated_at = now;
    }

    fn require(&self, expected: PublishState, next: PublishState) -> Result<(), DomainError> {
        if self.publish_state == expected {
            Ok(())
        } else {
            Err(DomainError::invalid_transition("content", self.publish_state, next))
        }
    }
}
