//! Notification sink port.

use async_trait::async_trait;
use thiserror::Error;

use super::models::NotificationEvent;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("Sink rejected payload: {0}")]
    Rejected(String),
}

/// One-way alert delivery. Fire-and-forget from the watcher's perspective:
/// the dedup key is already claimed before delivery is attempted, so a
/// failed delivery is logged and never retried or rolled back.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one alert. Implementations isolate their own partial
    /// failures (e.g. one of several webhook URLs being down).
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
