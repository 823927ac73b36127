use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "branded-login")]
#[command(about = "Edit a community's custom login message")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use a local JSON community store instead of the remote API
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// CLI profile name for API configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the branded login panel for a community
    Show {
        /// Community ID (or slug with --store)
        community: String,
        /// Output the community record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a new custom login message
    SetMessage {
        /// Community ID (or slug with --store)
        community: String,
        /// Message text (read from piped stdin when omitted)
        message: Vec<String>,
    },
    /// Turn branded login on
    Enable {
        /// Community ID (or slug with --store)
        community: String,
    },
    /// Turn branded login off
    Disable {
        /// Community ID (or slug with --store)
        community: String,
    },
    /// Edit the message interactively
    Edit {
        /// Community ID (or slug with --store)
        community: String,
    },
    /// Create a community in the local store
    Create {
        /// Community slug
        slug: String,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Elvish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Site base URL hosting the GraphQL API
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Bearer token for mutations
        #[arg(long, value_name = "TOKEN")]
        api_token: Option<String>,
        /// Local JSON store used when no API URL is set
        #[arg(long, value_name = "PATH")]
        store_path: Option<PathBuf>,
        /// HTTP request timeout in seconds
        #[arg(long, value_name = "SECS")]
        request_timeout_secs: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the resolved profile
    Show {
        /// Profile name to show
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
