use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use branded_login_core::models::{message_length, CommunityId, MAX_MESSAGE_CHARS};
use branded_login_core::notify::{NotificationKind, Toast, ToastQueue};
use branded_login_core::{BrandedLoginPanel, PanelView};

use crate::backend::Backend;
use crate::error::CliError;

pub type CliPanel = BrandedLoginPanel<Backend, Backend, Backend, Arc<ToastQueue>>;

pub fn parse_community(raw: &str) -> Result<CommunityId, CliError> {
    Ok(raw.parse::<CommunityId>()?)
}

/// Build a panel for the community and load it.
///
/// A community that fails to load is reported as not found.
pub async fn open_panel(
    backend: &Backend,
    community: &str,
) -> Result<(CliPanel, Arc<ToastQueue>), CliError> {
    let community = parse_community(community)?;
    tracing::debug!("Opening branded login panel for {} via {}", community, backend.describe());

    let toasts = Arc::new(ToastQueue::default());
    let mut panel = BrandedLoginPanel::new(
        community.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        Arc::clone(&toasts),
    );
    panel.load().await;

    if panel.view() == PanelView::Empty {
        return Err(CliError::CommunityNotFound(community.to_string()));
    }
    Ok((panel, toasts))
}

pub fn render_panel(view: &PanelView) -> Vec<String> {
    let form = match view {
        PanelView::Empty => return Vec::new(),
        PanelView::Loading => return vec!["Loading...".to_string()],
        PanelView::Form(form) => form,
    };

    let mut lines = vec![form.title.to_string(), form.subtitle.to_string(), String::new()];
    let mark = if form.toggle.is_enabled { "x" } else { " " };
    lines.push(format!("[{mark}] {}", form.toggle.label));

    if let Some(field) = &form.message_field {
        match field.value.as_deref() {
            Some(value) if !value.is_empty() => {
                lines.push(format!(
                    "Message ({}/{MAX_MESSAGE_CHARS}): {value}",
                    message_length(value)
                ));
            }
            _ => lines.push(format!("Message: <{}>", field.placeholder)),
        }
    }

    if let Some(error) = form.error {
        lines.push(format!("! {error}"));
    }

    if let Some(actions) = &form.actions {
        let save = if actions.saving {
            "[Saving...]"
        } else if actions.save_disabled {
            "[Save] (disabled)"
        } else {
            "[Save]"
        };
        lines.push(format!("{save}  Preview: {}", actions.preview_path));
    }

    lines
}

pub fn render_toasts(toasts: &[Toast]) -> Vec<String> {
    toasts
        .iter()
        .map(|toast| match toast.notification.kind {
            NotificationKind::Success => format!("ok: {}", toast.notification.payload),
            NotificationKind::Error => format!("error: {}", toast.notification.payload),
        })
        .collect()
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Message from the arguments, else from piped stdin.
pub fn resolve_message(message_parts: &[String]) -> Result<String, CliError> {
    if let Some(message) = normalize_message(&message_parts.join(" ")) {
        return Ok(message);
    }

    if let Some(message) = read_piped_stdin()? {
        return Ok(message);
    }

    Err(CliError::EmptyMessage)
}

/// Trim trailing newlines left by shells and pipes; reject blank input.
pub fn normalize_message(message: &str) -> Option<String> {
    let trimmed = message.trim_end_matches(['\n', '\r']);
    if trimmed.trim().is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_message(&buffer))
}
