use crate::backend::Backend;
use crate::commands::common::{open_panel, print_lines, render_panel};
use crate::error::CliError;

pub async fn run_show(backend: &Backend, community: &str, json: bool) -> Result<(), CliError> {
    let (panel, _toasts) = open_panel(backend, community).await?;

    if json {
        if let Some(record) = &panel.snapshot().record {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
    } else {
        print_lines(&render_panel(&panel.view()));
    }
    Ok(())
}
