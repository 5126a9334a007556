//! User-facing notifications
//!
//! Every mutating VFS operation reports a human-readable success or failure
//! message through a [`Notifier`]. This is a side channel for UIs; embedders
//! without one can use [`NullNotifier`].

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    /// Operation name, e.g. `create_file`
    pub operation: &'static str,
    pub message: String,
}

impl Notification {
    pub fn success(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            operation,
            message: message.into(),
        }
    }

    pub fn error(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            operation,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(
                op = notification.operation,
                "{}",
                notification.message
            ),
            NotificationLevel::Error => tracing::warn!(
                op = notification.operation,
                "{}",
                notification.message
            ),
        }
    }
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Keeps notifications in memory; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    recorded: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.recorded.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.recorded.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.recorded.lock().push(notification);
    }
}
