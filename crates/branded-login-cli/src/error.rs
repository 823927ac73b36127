use std::io;

use branded_login_core::controller::{FieldUnavailable, SubmitError};
use branded_login_core::SaveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] branded_login_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Unavailable(#[from] FieldUnavailable),
    #[error("Save failed: {0}")]
    Save(#[from] SaveError),
    #[error("Community not found: {0}")]
    CommunityNotFound(String),
    #[error("No message provided")]
    EmptyMessage,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("`create` only works with a local store; pass --store <PATH>")]
    LocalStoreRequired,
    #[error(
        "No backend configured. Run `branded-login config init --api-base-url <URL>`, set BRANDED_LOGIN_API_URL, or pass --store <PATH>."
    )]
    NotConfigured,
}
