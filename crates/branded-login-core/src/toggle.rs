//! Enable/disable control for branded login.
//!
//! Persists only the enabled flag, through its own service call; it never
//! reads or writes the message edit buffer.

use crate::models::{BrandedLogin, CommunityId};
use crate::notify::{Notification, NotificationSink};
use crate::services::{SaveError, ToggleService};

pub const ENABLED_MESSAGE: &str = "Branded login enabled";
pub const DISABLED_MESSAGE: &str = "Branded login disabled";

/// Render state of the toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub is_enabled: bool,
    pub label: &'static str,
}

impl ToggleView {
    pub const fn new(is_enabled: bool) -> Self {
        Self {
            is_enabled,
            label: if is_enabled {
                "Branded login is on"
            } else {
                "Branded login is off"
            },
        }
    }
}

pub struct ToggleControl<T, N> {
    service: T,
    sink: N,
}

impl<T, N> ToggleControl<T, N>
where
    T: ToggleService,
    N: NotificationSink,
{
    pub const fn new(service: T, sink: N) -> Self {
        Self { service, sink }
    }

    /// Persist the flag and report the outcome through the sink.
    pub async fn set_enabled(
        &self,
        community: &CommunityId,
        enabled: bool,
    ) -> Result<BrandedLogin, SaveError> {
        match self.service.set_enabled(community, enabled).await {
            Ok(settings) => {
                tracing::info!(
                    "Branded login for {} is now {}",
                    community,
                    if settings.is_enabled { "on" } else { "off" }
                );
                let message = if settings.is_enabled {
                    ENABLED_MESSAGE
                } else {
                    DISABLED_MESSAGE
                };
                self.sink.notify(Notification::success(message));
                Ok(settings)
            }
            Err(error) => {
                tracing::error!("Failed to toggle branded login for {}: {}", community, error);
                self.sink.notify(Notification::error(error.detail()));
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::notify::{NotificationKind, ToastQueue};

    struct FakeToggle {
        stored: Mutex<BrandedLogin>,
        failure: Option<&'static str>,
    }

    impl ToggleService for FakeToggle {
        async fn set_enabled(
            &self,
            _community: &CommunityId,
            enabled: bool,
        ) -> Result<BrandedLogin, SaveError> {
            if let Some(detail) = self.failure {
                return Err(SaveError::new(detail));
            }
            let mut stored = self.stored.lock().unwrap();
            stored.is_enabled = enabled;
            Ok(stored.clone())
        }
    }

    fn community() -> CommunityId {
        "community-1".parse().unwrap()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn enabling_notifies_success_and_keeps_message() {
        let toasts = ToastQueue::default();
        let service = FakeToggle {
            stored: Mutex::new(BrandedLogin {
                is_enabled: false,
                message: Some("Hello".to_string()),
            }),
            failure: None,
        };
        let toggle = ToggleControl::new(service, &toasts);

        let settings = toggle.set_enabled(&community(), true).await.unwrap();
        assert!(settings.is_enabled);
        assert_eq!(settings.message.as_deref(), Some("Hello"));

        let sent = toasts.take_all();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].notification, Notification::success(ENABLED_MESSAGE));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failure_is_reported_verbatim() {
        let toasts = ToastQueue::default();
        let toggle = ToggleControl::new(
            FakeToggle {
                stored: Mutex::new(BrandedLogin::default()),
                failure: Some("You don't have permission to manage this community"),
            },
            &toasts,
        );

        let error = toggle.set_enabled(&community(), true).await.unwrap_err();
        assert_eq!(
            error.detail(),
            "You don't have permission to manage this community"
        );
        let sent = toasts.take_all();
        assert_eq!(sent[0].notification.kind, NotificationKind::Error);
        assert_eq!(sent[0].notification.payload, error.detail());
    }

    #[test]
    fn view_label_follows_flag() {
        assert_eq!(ToggleView::new(true).label, "Branded login is on");
        assert_eq!(ToggleView::new(false).label, "Branded login is off");
    }
}
