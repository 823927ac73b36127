//! Community record model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::BrandedLogin;
use crate::error::Error;

/// Opaque community identifier as issued by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityId(String);

impl CommunityId {
    /// Generate a fresh identifier for locally created communities (UUID v7)
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CommunityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput(
                "community id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A community as loaded from the remote source.
///
/// Owned by the remote side; the edit controller only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRecord {
    pub id: CommunityId,
    pub slug: String,
    #[serde(default)]
    pub branded_login: BrandedLogin,
}

impl CommunityRecord {
    /// Create a community with branded login disabled and no message
    #[must_use]
    pub fn new(id: CommunityId, slug: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            branded_login: BrandedLogin::default(),
        }
    }

    /// Path of the community's login screen, used for previews
    #[must_use]
    pub fn login_path(&self) -> String {
        format!("/{}/login", self.slug)
    }
}

/// What the remote source currently reports: the record, if any, and
/// whether a load is in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub record: Option<CommunityRecord>,
    pub is_loading: bool,
}

impl RecordSnapshot {
    /// Nothing loaded yet and a request in flight
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            record: None,
            is_loading: true,
        }
    }

    /// A finished load that produced a record
    #[must_use]
    pub const fn loaded(record: CommunityRecord) -> Self {
        Self {
            record: Some(record),
            is_loading: false,
        }
    }

    /// A finished load that produced nothing (missing or failed)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            record: None,
            is_loading: false,
        }
    }

    pub const fn has_record(&self) -> bool {
        self.record.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_id_rejects_blank_input() {
        assert!("   ".parse::<CommunityId>().is_err());
        let id: CommunityId = " ce2b4488 ".parse().unwrap();
        assert_eq!(id.as_str(), "ce2b4488");
    }

    #[test]
    fn login_path_uses_slug() {
        let record = CommunityRecord::new(CommunityId::generate(), "spectrum");
        assert_eq!(record.login_path(), "/spectrum/login");
    }

    #[test]
    fn record_deserializes_graphql_shape() {
        let payload = r#"{
            "id": "ce2b4488-4c75-47e0-8ebc-2539c1e6a191",
            "slug": "spectrum",
            "brandedLogin": { "isEnabled": true, "message": "Welcome!" }
        }"#;
        let record: CommunityRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.id.as_str(), "ce2b4488-4c75-47e0-8ebc-2539c1e6a191");
        assert!(record.branded_login.is_enabled);
        assert_eq!(record.branded_login.message.as_deref(), Some("Welcome!"));
    }
}
