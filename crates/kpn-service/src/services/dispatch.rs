//! Notification dispatchers
//!
//! Delivery to members (SMS, push, email) lives outside the engine; these
//! implementations cover logging and test observation.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use kpn_core::traits::NotificationDispatcher;
use kpn_core::{DomainError, DomainEvent};

/// Logs every event at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingDispatcher {
    async fn dispatch(&self, event: &DomainEvent) -> Result<(), DomainError> {
        let recipients: Vec<String> = event.recipients().iter().map(ToString::to_string).collect();
        info!(
            event_type = event.event_type(),
            recipients = ?recipients,
            timestamp = %event.timestamp(),
            "Domain event"
        );
        Ok(())
    }
}

/// Keeps every dispatched event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events dispatched so far, oldest first
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(DomainEvent::event_type).collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, event: &DomainEvent) -> Result<(), DomainError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
