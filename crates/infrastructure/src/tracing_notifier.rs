use async_trait::async_trait;
use grantline_application::{Notification, NotificationKind, Notifier};
use tracing::{info, warn};

/// Notifier that reports notifications through the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => info!(notification = %notification.text, "notification"),
            NotificationKind::Error => warn!(notification = %notification.text, "notification"),
        }
    }
}
