//! Outbound notification port

use async_trait::async_trait;

use crate::error::DomainError;
use crate::events::DomainEvent;

/// Delivers domain events to members (email, WhatsApp, in-app)
///
/// Dispatch happens after the operation has committed. Callers log a
/// failure and move on; nothing is rolled back.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, event: &DomainEvent) -> Result<(), DomainError>;
}
