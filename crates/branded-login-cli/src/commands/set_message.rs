use branded_login_core::notify::Toast;

use crate::backend::Backend;
use crate::commands::common::{open_panel, render_toasts, resolve_message};
use crate::error::CliError;

pub async fn run_set_message(
    backend: &Backend,
    community: &str,
    message_parts: &[String],
) -> Result<(), CliError> {
    let message = resolve_message(message_parts)?;
    let toasts = set_message(backend, community, &message).await?;
    for line in render_toasts(&toasts) {
        println!("{line}");
    }
    Ok(())
}

/// Edit, submit, and wait for the save; returns the toasts it produced.
pub async fn set_message(
    backend: &Backend,
    community: &str,
    message: &str,
) -> Result<Vec<Toast>, CliError> {
    let (mut panel, toasts) = open_panel(backend, community).await?;
    panel.input(message)?;

    let result = panel.save_now().await?;
    let produced = toasts.take_all();
    result?;
    Ok(produced)
}
