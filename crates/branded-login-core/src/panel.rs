//! Branded login settings panel
//!
//! Wires the edit controller to its collaborators and produces a
//! render-agnostic view of the panel. Front ends draw [`PanelView`] however
//! they like and feed user events back through the panel methods.

use crate::controller::{
    EditBufferController, FieldUnavailable, PendingSave, SaveCompletion, SubmitError,
    LENGTH_ERROR_MESSAGE,
};
use crate::models::{CommunityId, RecordSnapshot};
use crate::notify::NotificationSink;
use crate::services::{load_snapshot, RemoteRecordSource, SaveError, SaveService, ToggleService};
use crate::toggle::{ToggleControl, ToggleView};

pub const TITLE: &str = "Branded Login";
pub const SUBTITLE: &str = "Display a custom login message when people are signing up \
directly from your community's profile";
pub const MESSAGE_PLACEHOLDER: &str = "Set a custom message for the login screen";

/// What the panel should currently show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// No record and nothing loading; nothing to render
    Empty,
    Loading,
    Form(FormView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub toggle: ToggleView,
    /// Present only while branded login is enabled
    pub message_field: Option<MessageField>,
    /// Inline length error
    pub error: Option<&'static str>,
    /// Present only while branded login is enabled
    pub actions: Option<FormActions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageField {
    /// Message stored remotely
    pub default_value: Option<String>,
    /// Current edit buffer
    pub value: Option<String>,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormActions {
    pub save_disabled: bool,
    pub saving: bool,
    /// Link to the community's login screen
    pub preview_path: String,
}

pub struct BrandedLoginPanel<R, S, T, N> {
    community: CommunityId,
    source: R,
    toggle: ToggleControl<T, N>,
    controller: EditBufferController<S, N>,
    snapshot: RecordSnapshot,
}

impl<R, S, T, N> BrandedLoginPanel<R, S, T, N>
where
    R: RemoteRecordSource,
    S: SaveService + Clone,
    T: ToggleService,
    N: NotificationSink + Clone,
{
    pub fn new(community: CommunityId, source: R, save: S, toggle: T, sink: N) -> Self {
        Self {
            community,
            source,
            toggle: ToggleControl::new(toggle, sink.clone()),
            controller: EditBufferController::new(save, sink),
            snapshot: RecordSnapshot::default(),
        }
    }

    pub const fn community(&self) -> &CommunityId {
        &self.community
    }

    pub const fn controller(&self) -> &EditBufferController<S, N> {
        &self.controller
    }

    pub const fn snapshot(&self) -> &RecordSnapshot {
        &self.snapshot
    }

    /// Fetch the community and apply the result.
    ///
    /// Any record already shown stays visible while the fetch runs.
    pub async fn load(&mut self) {
        let mut loading = self.snapshot.clone();
        loading.is_loading = true;
        self.apply_snapshot(loading);

        let snapshot = load_snapshot(&self.source, &self.community).await;
        self.apply_snapshot(snapshot);
    }

    /// Apply a snapshot delivered by the remote source.
    pub fn apply_snapshot(&mut self, snapshot: RecordSnapshot) {
        self.controller.observe(&snapshot);
        self.snapshot = snapshot;
    }

    pub fn input(&mut self, text: impl Into<String>) -> Result<(), FieldUnavailable> {
        self.controller.edit(text)
    }

    pub fn submit(&mut self) -> Result<PendingSave<S>, SubmitError> {
        self.controller.submit()
    }

    pub fn complete(&mut self, completion: SaveCompletion) {
        self.controller.complete(completion);
    }

    /// Submit and wait for the save in one step, for front ends that have
    /// nothing else to do meanwhile.
    pub async fn save_now(&mut self) -> Result<Result<(), SaveError>, SubmitError> {
        self.controller.save_now().await
    }

    /// Flip the enabled flag through the toggle control.
    ///
    /// On success the shown record picks up the new flag; the edit buffer is
    /// left alone.
    pub async fn set_enabled(&mut self, enabled: bool) -> Result<(), SaveError> {
        let Some(id) = self.snapshot.record.as_ref().map(|record| record.id.clone()) else {
            return Err(SaveError::new(FieldUnavailable::NotLoaded.to_string()));
        };

        let settings = self.toggle.set_enabled(&id, enabled).await?;
        let mut snapshot = self.snapshot.clone();
        if let Some(record) = snapshot.record.as_mut() {
            record.branded_login = settings;
        }
        self.apply_snapshot(snapshot);
        Ok(())
    }

    pub fn view(&self) -> PanelView {
        let Some(record) = &self.snapshot.record else {
            return if self.snapshot.is_loading {
                PanelView::Loading
            } else {
                PanelView::Empty
            };
        };

        let buffer = self.controller.buffer();
        let is_enabled = record.branded_login.is_enabled;

        let message_field = is_enabled.then(|| MessageField {
            default_value: record.branded_login.message.clone(),
            value: buffer.message_value.clone(),
            placeholder: MESSAGE_PLACEHOLDER,
        });
        let actions = is_enabled.then(|| FormActions {
            save_disabled: buffer.message_length_error,
            saving: self.controller.in_flight() > 0,
            preview_path: record.login_path(),
        });

        PanelView::Form(FormView {
            title: TITLE,
            subtitle: SUBTITLE,
            toggle: ToggleView::new(is_enabled),
            message_field,
            error: buffer.message_length_error.then_some(LENGTH_ERROR_MESSAGE),
            actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{BrandedLogin, CommunityRecord, MAX_MESSAGE_CHARS};
    use crate::notify::{Notification, ToastQueue};
    use crate::services::SaveRequest;
    use crate::Result;

    #[derive(Default)]
    struct FakeBackend {
        record: Mutex<Option<CommunityRecord>>,
        saves: Mutex<Vec<SaveRequest>>,
    }

    impl FakeBackend {
        fn with_record(enabled: bool, message: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                record: Mutex::new(Some(CommunityRecord {
                    id: community(),
                    slug: "spectrum".to_string(),
                    branded_login: BrandedLogin {
                        is_enabled: enabled,
                        message: message.map(ToString::to_string),
                    },
                })),
                saves: Mutex::new(Vec::new()),
            })
        }

        fn set_message(&self, message: &str) {
            if let Some(record) = self.record.lock().unwrap().as_mut() {
                record.branded_login.message = Some(message.to_string());
            }
        }
    }

    impl RemoteRecordSource for FakeBackend {
        async fn fetch(&self, _community: &CommunityId) -> Result<Option<CommunityRecord>> {
            Ok(self.record.lock().unwrap().clone())
        }
    }

    impl SaveService for FakeBackend {
        async fn save(&self, request: &SaveRequest) -> std::result::Result<(), SaveError> {
            self.saves.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    impl ToggleService for FakeBackend {
        async fn set_enabled(
            &self,
            _community: &CommunityId,
            enabled: bool,
        ) -> std::result::Result<BrandedLogin, SaveError> {
            let mut record = self.record.lock().unwrap();
            let record = record
                .as_mut()
                .ok_or_else(|| SaveError::new("Community not found"))?;
            record.branded_login.is_enabled = enabled;
            Ok(record.branded_login.clone())
        }
    }

    type TestPanel =
        BrandedLoginPanel<Arc<FakeBackend>, Arc<FakeBackend>, Arc<FakeBackend>, Arc<ToastQueue>>;

    fn community() -> CommunityId {
        "community-1".parse().unwrap()
    }

    fn panel(backend: &Arc<FakeBackend>) -> (TestPanel, Arc<ToastQueue>) {
        let toasts = Arc::new(ToastQueue::default());
        let panel = BrandedLoginPanel::new(
            community(),
            Arc::clone(backend),
            Arc::clone(backend),
            Arc::clone(backend),
            Arc::clone(&toasts),
        );
        (panel, toasts)
    }

    fn form(view: PanelView) -> FormView {
        match view {
            PanelView::Form(form) => form,
            other => panic!("expected form view, got {other:?}"),
        }
    }

    #[test]
    fn length_error_text_names_the_limit() {
        assert!(LENGTH_ERROR_MESSAGE.contains(&MAX_MESSAGE_CHARS.to_string()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn shows_loading_then_empty_when_missing() {
        let backend = Arc::new(FakeBackend::default());
        let (mut panel, _) = panel(&backend);
        assert_eq!(panel.view(), PanelView::Empty);

        panel.apply_snapshot(RecordSnapshot::loading());
        assert_eq!(panel.view(), PanelView::Loading);

        panel.load().await;
        assert_eq!(panel.view(), PanelView::Empty);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn enabled_form_shows_field_and_actions() {
        let backend = FakeBackend::with_record(true, Some("Welcome!"));
        let (mut panel, _) = panel(&backend);
        panel.load().await;

        let view = form(panel.view());
        assert_eq!(view.title, TITLE);
        assert!(view.toggle.is_enabled);
        assert_eq!(
            view.message_field,
            Some(MessageField {
                default_value: Some("Welcome!".to_string()),
                value: Some("Welcome!".to_string()),
                placeholder: MESSAGE_PLACEHOLDER,
            })
        );
        assert_eq!(view.error, None);
        assert_eq!(
            view.actions,
            Some(FormActions {
                save_disabled: false,
                saving: false,
                preview_path: "/spectrum/login".to_string(),
            })
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn disabled_form_hides_field_and_save() {
        let backend = FakeBackend::with_record(false, Some("Welcome!"));
        let (mut panel, toasts) = panel(&backend);
        panel.load().await;

        let view = form(panel.view());
        assert!(!view.toggle.is_enabled);
        assert_eq!(view.message_field, None);
        assert_eq!(view.actions, None);
        assert!(panel.submit().is_err());
        assert!(panel.input("x".repeat(400)).is_err());
        assert_eq!(form(panel.view()).error, None);
        assert!(backend.saves.lock().unwrap().is_empty());
        assert!(toasts.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn long_input_shows_inline_error_and_disables_save() {
        let backend = FakeBackend::with_record(true, None);
        let (mut panel, _) = panel(&backend);
        panel.load().await;

        panel.input("x".repeat(MAX_MESSAGE_CHARS + 1)).unwrap();
        let view = form(panel.view());
        assert_eq!(view.error, Some(LENGTH_ERROR_MESSAGE));
        assert!(view.actions.unwrap().save_disabled);

        panel.input("fits").unwrap();
        let view = form(panel.view());
        assert_eq!(view.error, None);
        assert!(!view.actions.unwrap().save_disabled);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reload_does_not_clobber_edit() {
        let backend = FakeBackend::with_record(true, Some("first"));
        let (mut panel, _) = panel(&backend);
        panel.load().await;
        panel.input("my draft").unwrap();

        backend.set_message("changed elsewhere");
        panel.load().await;

        let field = form(panel.view()).message_field.unwrap();
        assert_eq!(field.default_value.as_deref(), Some("changed elsewhere"));
        assert_eq!(field.value.as_deref(), Some("my draft"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn deleted_community_empties_view_and_blocks_input() {
        let backend = FakeBackend::with_record(true, Some("first"));
        let (mut panel, _) = panel(&backend);
        panel.load().await;
        panel.input("my draft").unwrap();

        *backend.record.lock().unwrap() = None;
        panel.load().await;

        assert_eq!(panel.view(), PanelView::Empty);
        assert!(panel.input("more").is_err());
        assert!(panel.submit().is_err());
        assert!(backend.saves.lock().unwrap().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn save_round_trip_shows_saving_state() {
        let backend = FakeBackend::with_record(true, None);
        let (mut panel, toasts) = panel(&backend);
        panel.load().await;
        panel.input("Welcome!").unwrap();

        let pending = panel.submit().unwrap();
        assert!(form(panel.view()).actions.unwrap().saving);

        let completion = pending.run().await;
        panel.complete(completion);
        assert!(!form(panel.view()).actions.unwrap().saving);

        assert_eq!(
            backend.saves.lock().unwrap().clone(),
            vec![SaveRequest {
                id: community(),
                message: Some("Welcome!".to_string()),
            }]
        );
        let sent: Vec<Notification> = toasts
            .take_all()
            .into_iter()
            .map(|toast| toast.notification)
            .collect();
        assert_eq!(sent, vec![Notification::success("Saved!")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn save_now_runs_full_round_trip() {
        let backend = FakeBackend::with_record(true, None);
        let (mut panel, toasts) = panel(&backend);
        panel.load().await;

        panel.input("Welcome!").unwrap();
        assert_eq!(panel.save_now().await.unwrap(), Ok(()));
        assert_eq!(panel.controller().in_flight(), 0);
        assert_eq!(backend.saves.lock().unwrap().len(), 1);
        assert_eq!(toasts.len(), 1);

        panel.input("x".repeat(MAX_MESSAGE_CHARS + 1)).unwrap();
        assert!(matches!(
            panel.save_now().await,
            Err(SubmitError::Invalid(_))
        ));
        assert_eq!(backend.saves.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn toggling_updates_view_but_not_buffer() {
        let backend = FakeBackend::with_record(false, Some("stored"));
        let (mut panel, toasts) = panel(&backend);
        panel.load().await;

        panel.set_enabled(true).await.unwrap();
        let view = form(panel.view());
        assert!(view.toggle.is_enabled);
        assert_eq!(
            view.message_field.unwrap().value.as_deref(),
            Some("stored")
        );
        assert_eq!(toasts.len(), 1);

        panel.input("edited").unwrap();
        panel.set_enabled(false).await.unwrap();
        assert_eq!(
            panel.controller().buffer().message_value.as_deref(),
            Some("edited")
        );
        assert_eq!(form(panel.view()).message_field, None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn toggling_before_load_is_rejected() {
        let backend = FakeBackend::with_record(false, None);
        let (mut panel, toasts) = panel(&backend);
        assert!(panel.set_enabled(true).await.is_err());
        assert!(toasts.is_empty());
    }
}
