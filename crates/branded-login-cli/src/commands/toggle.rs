use branded_login_core::notify::Toast;

use crate::backend::Backend;
use crate::commands::common::{open_panel, render_toasts};
use crate::error::CliError;

pub async fn run_toggle(backend: &Backend, community: &str, enabled: bool) -> Result<(), CliError> {
    let toasts = set_enabled(backend, community, enabled).await?;
    for line in render_toasts(&toasts) {
        println!("{line}");
    }
    Ok(())
}

pub async fn set_enabled(
    backend: &Backend,
    community: &str,
    enabled: bool,
) -> Result<Vec<Toast>, CliError> {
    let (mut panel, toasts) = open_panel(backend, community).await?;
    let result = panel.set_enabled(enabled).await;
    let produced = toasts.take_all();
    result?;
    Ok(produced)
}
