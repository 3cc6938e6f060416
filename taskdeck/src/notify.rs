//! Transient notifications reporting the outcome of a user action.
//!
//! The surface drains the queue after each command and shows every entry
//! once.

use std::collections::VecDeque;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Ordinary confirmation.
    Default,
    /// Something went wrong.
    Destructive,
}

/// A short-lived message shown after an operation resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Headline, e.g. "Task added".
    pub title: String,
    /// Detail line.
    pub description: String,
    /// Visual weight.
    pub variant: Variant,
}

impl Notification {
    /// Creates a confirmation notification.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_variant(title, description, Variant::Default)
    }

    /// Creates an error notification.
    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_variant(title, description, Variant::Destructive)
    }

    fn with_variant(
        title: impl Into<String>,
        description: impl Into<String>,
        variant: Variant,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
        }
    }

    /// Whether this is an error notification.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

/// FIFO of pending notifications.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    /// Queues a notification.
    pub fn push(&mut self, notification: Notification) {
        if notification.is_destructive() {
            tracing::debug!(title = %notification.title, description = %notification.description, "error notification");
        }
        self.queue.push_back(notification);
    }

    /// Removes and returns everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }
}
