//! Selects where community records come from: the GraphQL API or a local
//! JSON store.

use std::env;
use std::path::PathBuf;

use branded_login_core::config::ApiConfig;
use branded_login_core::graphql::GraphqlClient;
use branded_login_core::models::{BrandedLogin, CommunityId, CommunityRecord};
use branded_login_core::services::{RemoteRecordSource, SaveService, ToggleService};
use branded_login_core::store::LocalCommunityStore;
use branded_login_core::{SaveError, SaveRequest};

use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

#[derive(Debug, Clone)]
pub enum Backend {
    Remote(GraphqlClient),
    Local(LocalCommunityStore),
}

impl Backend {
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(client) => format!("API {}", client.endpoint()),
            Self::Local(store) => format!("local store {}", store.path().display()),
        }
    }
}

impl RemoteRecordSource for Backend {
    async fn fetch(
        &self,
        community: &CommunityId,
    ) -> branded_login_core::Result<Option<CommunityRecord>> {
        match self {
            Self::Remote(client) => client.fetch(community).await,
            Self::Local(store) => store.fetch(community).await,
        }
    }
}

impl SaveService for Backend {
    async fn save(&self, request: &SaveRequest) -> Result<(), SaveError> {
        match self {
            Self::Remote(client) => client.save(request).await,
            Self::Local(store) => store.save(request).await,
        }
    }
}

impl ToggleService for Backend {
    async fn set_enabled(
        &self,
        community: &CommunityId,
        enabled: bool,
    ) -> Result<BrandedLogin, SaveError> {
        match self {
            Self::Remote(client) => client.set_enabled(community, enabled).await,
            Self::Local(store) => store.set_enabled(community, enabled).await,
        }
    }
}

/// Values that can override a profile from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_base_url: normalize_text_option(env::var("BRANDED_LOGIN_API_URL").ok()),
            api_token: normalize_text_option(env::var("BRANDED_LOGIN_API_TOKEN").ok()),
        }
    }
}

/// Resolve the backend for this invocation.
///
/// `--store` wins; otherwise the selected profile and environment decide.
pub fn resolve_backend(
    store: Option<PathBuf>,
    profile_name: Option<&str>,
) -> Result<Backend, CliError> {
    if let Some(path) = store {
        return Ok(Backend::Local(LocalCommunityStore::new(path)));
    }

    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&name).cloned().unwrap_or_default();
    backend_from_profile(&profile, &EnvOverrides::from_env())
}

/// An API URL (environment first, then profile) selects the remote backend;
/// a profile store path is the fallback.
pub fn backend_from_profile(
    profile: &CliProfile,
    overrides: &EnvOverrides,
) -> Result<Backend, CliError> {
    profile.validate().map_err(CliError::Config)?;
    let api_base_url = overrides
        .api_base_url
        .clone()
        .or_else(|| profile.api_base_url());

    if let Some(url) = api_base_url {
        let token = overrides.api_token.clone().or_else(|| profile.api_token());
        let config = ApiConfig::new(&url, token, profile.request_timeout_secs)?;
        tracing::debug!("Using GraphQL API at {}", config.graphql_endpoint());
        return Ok(Backend::Remote(GraphqlClient::new(&config)?));
    }

    if let Some(path) = profile.store_path() {
        return Ok(Backend::Local(LocalCommunityStore::new(path)));
    }

    Err(CliError::NotConfigured)
}
