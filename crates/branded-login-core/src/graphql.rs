//! GraphQL API client for community branded login settings.
//!
//! Implements the record source, save, and toggle collaborators against the
//! community GraphQL endpoint over HTTP.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{BrandedLogin, CommunityId, CommunityRecord};
use crate::services::{RemoteRecordSource, SaveError, SaveRequest, SaveService, ToggleService};
use crate::util::compact_text;

const COMMUNITY_FIELDS: &str = "id slug brandedLogin { isEnabled message }";

/// HTTP client for the community GraphQL API.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl GraphqlClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: config.graphql_endpoint(),
            token: config.api_token.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(&self, body: &Value) -> std::result::Result<T, String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| format!("GraphQL request failed: {error}"))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| format!("Failed to read GraphQL response body: {error}"))?;

        if !status.is_success() {
            // Error statuses may still carry a GraphQL error body.
            if let Ok(Err(message)) = parse_graphql_response::<Value>(&text) {
                return Err(message);
            }
            return Err(format!(
                "GraphQL endpoint returned HTTP {}: {}",
                status.as_u16(),
                compact_text(&text)
            ));
        }

        parse_graphql_response(&text)?
    }

    async fn mutate_community(&self, body: &Value) -> std::result::Result<CommunityRecord, String> {
        let data: BTreeMap<String, Option<CommunityRecord>> = self.execute(body).await?;
        data.into_values()
            .next()
            .flatten()
            .ok_or_else(|| "Mutation response did not include a community".to_string())
    }
}

impl RemoteRecordSource for GraphqlClient {
    async fn fetch(&self, community: &CommunityId) -> Result<Option<CommunityRecord>> {
        tracing::debug!("Fetching community {} from {}", community, self.endpoint);
        let data: CommunityData = self
            .execute(&community_query(community))
            .await
            .map_err(Error::Api)?;
        Ok(data.community)
    }
}

impl SaveService for GraphqlClient {
    async fn save(&self, request: &SaveRequest) -> std::result::Result<(), SaveError> {
        self.mutate_community(&save_mutation(request))
            .await
            .map(|_| ())
            .map_err(SaveError::new)
    }
}

impl ToggleService for GraphqlClient {
    async fn set_enabled(
        &self,
        community: &CommunityId,
        enabled: bool,
    ) -> std::result::Result<BrandedLogin, SaveError> {
        self.mutate_community(&toggle_mutation(community, enabled))
            .await
            .map(|record| record.branded_login)
            .map_err(SaveError::new)
    }
}

/// Request body for loading a community by id.
pub fn community_query(community: &CommunityId) -> Value {
    json!({
        "query": format!(
            "query getCommunityById($id: ID) {{ community(id: $id) {{ {COMMUNITY_FIELDS} }} }}"
        ),
        "variables": { "id": community },
    })
}

/// Request body for saving the custom login message.
pub fn save_mutation(request: &SaveRequest) -> Value {
    json!({
        "query": format!(
            "mutation saveBrandedLoginSettings($input: SaveBrandedLoginSettingsInput!) \
             {{ saveBrandedLoginSettings(input: $input) {{ {COMMUNITY_FIELDS} }} }}"
        ),
        "variables": { "input": request },
    })
}

/// Request body for enabling or disabling branded login.
pub fn toggle_mutation(community: &CommunityId, enabled: bool) -> Value {
    let (operation, input_type) = if enabled {
        ("enableBrandedLogin", "EnableBrandedLoginInput")
    } else {
        ("disableBrandedLogin", "DisableBrandedLoginInput")
    };
    json!({
        "query": format!(
            "mutation {operation}($input: {input_type}!) \
             {{ {operation}(input: $input) {{ {COMMUNITY_FIELDS} }} }}"
        ),
        "variables": { "input": { "id": community } },
    })
}

/// Parse a GraphQL response body.
///
/// Outer error: the body is not a GraphQL response at all. Inner error: the
/// server reported an error, carried as its first message verbatim.
pub fn parse_graphql_response<T: DeserializeOwned>(
    body: &str,
) -> std::result::Result<std::result::Result<T, String>, String> {
    let response: GraphqlResponse<T> = serde_json::from_str(body)
        .map_err(|error| format!("Invalid GraphQL response: {error}"))?;

    if let Some(error) = response.errors.into_iter().next() {
        return Ok(Err(error.message));
    }
    Ok(response
        .data
        .ok_or_else(|| "GraphQL response did not include data".to_string()))
}

// ---------------------------------------------------------------------------
// Private
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommunityData {
    community: Option<CommunityRecord>,
}
