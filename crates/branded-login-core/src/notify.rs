//! Transient user-facing notifications

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// How long a toast stays visible unless configured otherwise.
pub const DEFAULT_TOAST_TTL_SECS: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A success or failure event for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub payload: String,
}

impl Notification {
    pub fn success(payload: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            payload: payload.into(),
        }
    }

    pub fn error(payload: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            payload: payload.into(),
        }
    }
}

/// Receives notifications; fire-and-forget.
pub trait NotificationSink {
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// A notification with a display deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub notification: Notification,
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-memory toast list, the sink used by interactive front ends.
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    toasts: Mutex<Vec<Toast>>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TOAST_TTL_SECS))
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            toasts: Mutex::new(Vec::new()),
        }
    }

    /// Toasts still visible at `now`, oldest first
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Toast> {
        self.lock()
            .iter()
            .filter(|toast| toast.is_active_at(now))
            .cloned()
            .collect()
    }

    /// Drop expired toasts, returning how many were removed
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|toast| toast.is_active_at(now));
        before - toasts.len()
    }

    /// Remove and return every queued toast
    pub fn take_all(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::debug!("Toast: {}", notification.payload),
            NotificationKind::Error => tracing::warn!("Error toast: {}", notification.payload),
        }
        let toast = Toast {
            id: Uuid::now_v7(),
            notification,
            expires_at: Utc::now() + self.ttl,
        };
        self.lock().push(toast);
    }
}
