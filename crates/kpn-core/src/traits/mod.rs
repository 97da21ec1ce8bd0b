//! Ports implemented by the infrastructure crates

mod notifier;
mod repositories;

pub use notifier::NotificationDispatcher;
pub use repositories::*;
