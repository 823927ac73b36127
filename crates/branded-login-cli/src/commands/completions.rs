use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::aot::Shell;
use clap_complete::generate;

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

const BIN_NAME: &str = "branded-login";

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
            CompletionShell::Elvish => Self::Elvish,
            CompletionShell::PowerShell => Self::PowerShell,
        }
    }
}

/// Write the script to `output_path` (creating its directory) or stdout.
pub fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let script = render_completions(shell);

    let Some(path) = output_path else {
        io::stdout().write_all(&script)?;
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &script)?;
    tracing::info!("Wrote {:?} completions to {}", shell, path.display());
    println!("{}", path.display());
    Ok(())
}

pub fn render_completions(shell: CompletionShell) -> Vec<u8> {
    let mut script = Vec::new();
    generate(Shell::from(shell), &mut Cli::command(), BIN_NAME, &mut script);
    script
}
