use std::path::PathBuf;

use branded_login_core::config::DEFAULT_REQUEST_TIMEOUT_SECS;

use crate::cli::ConfigCommands;
use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Values passed to `config init`; `None` keeps what the profile has.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub store_path: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            api_token,
            store_path,
            request_timeout_secs,
            no_activate,
        } => {
            let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let update = ProfileUpdate {
                api_base_url,
                api_token,
                store_path,
                request_timeout_secs,
            };
            apply_profile_update(&mut config, &profile_name, update, !no_activate)?;

            let path = config.save().map_err(CliError::Config)?;
            println!("Profile '{}' saved to {}", profile_name, path.display());
            Ok(())
        }
        ConfigCommands::Show { profile } => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile.as_deref().or(global_profile));
            let profile = config.profile(&profile_name).cloned().unwrap_or_default();
            for line in describe_profile(&profile_name, &profile) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Merge an update into the named profile, validating the result.
pub fn apply_profile_update(
    config: &mut CliProfilesConfig,
    profile_name: &str,
    update: ProfileUpdate,
    activate: bool,
) -> Result<(), CliError> {
    let mut profile = config.profile(profile_name).cloned().unwrap_or_default();
    if let Some(url) = normalize_text_option(update.api_base_url) {
        profile.api_base_url = Some(url);
    }
    if let Some(token) = normalize_text_option(update.api_token) {
        profile.api_token = Some(token);
    }
    if let Some(path) = update.store_path {
        profile.store_path = Some(path);
    }
    if let Some(timeout) = update.request_timeout_secs {
        profile.request_timeout_secs = Some(timeout);
    }

    profile.validate().map_err(CliError::Config)?;
    *config.profile_mut_or_default(profile_name) = profile;
    if activate {
        config.active_profile = Some(profile_name.to_string());
    }
    Ok(())
}

pub fn describe_profile(name: &str, profile: &CliProfile) -> Vec<String> {
    let or_unset = |value: Option<String>| value.unwrap_or_else(|| "(not set)".to_string());
    vec![
        format!("profile: {name}"),
        format!("api_base_url: {}", or_unset(profile.api_base_url())),
        format!(
            "api_token: {}",
            if profile.api_token().is_some() {
                "(set)"
            } else {
                "(not set)"
            }
        ),
        format!(
            "store_path: {}",
            or_unset(profile.store_path().map(|path| path.display().to_string()))
        ),
        format!(
            "request_timeout_secs: {}",
            profile
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
        ),
    ]
}
