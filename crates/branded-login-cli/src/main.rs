//! Branded login CLI - edit a community's custom login message
//!
//! Loads a community from the GraphQL API (or a local JSON store), lets the
//! owner toggle branded login, and saves the message with the same edit
//! buffer rules as the settings panel.

mod backend;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;

use crate::backend::resolve_backend;
use crate::cli::{Cli, Commands};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::create::run_create;
use crate::commands::edit::run_edit;
use crate::commands::set_message::run_set_message;
use crate::commands::show::run_show;
use crate::commands::toggle::run_toggle;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "branded_login=info"
            .parse()
            .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
        Commands::Show { community, json } => {
            let backend = resolve_backend(cli.store, profile)?;
            run_show(&backend, &community, json).await?;
        }
        Commands::SetMessage { community, message } => {
            let backend = resolve_backend(cli.store, profile)?;
            run_set_message(&backend, &community, &message).await?;
        }
        Commands::Enable { community } => {
            let backend = resolve_backend(cli.store, profile)?;
            run_toggle(&backend, &community, true).await?;
        }
        Commands::Disable { community } => {
            let backend = resolve_backend(cli.store, profile)?;
            run_toggle(&backend, &community, false).await?;
        }
        Commands::Edit { community } => {
            let backend = resolve_backend(cli.store, profile)?;
            run_edit(&backend, &community).await?;
        }
        Commands::Create { slug } => {
            let backend = resolve_backend(cli.store, profile)?;
            run_create(&backend, &slug).await?;
        }
    }

    Ok(())
}
