use async_trait::async_trait;

/// Outcome category of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
}

/// User-facing notification emitted by the editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Outcome category.
    pub kind: NotificationKind,
    /// Short message.
    pub text: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

/// Port for surfacing notifications to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification. Delivery failures are the adapter's concern.
    async fn notify(&self, notification: Notification);
}
