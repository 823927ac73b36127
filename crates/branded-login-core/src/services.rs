//! Collaborator interfaces for the branded login panel.
//!
//! The edit controller never knows how a record is loaded or where a save
//! goes; it is handed implementations of these traits instead. The GraphQL
//! client and the local JSON store both implement all of them.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::models::{BrandedLogin, CommunityId, CommunityRecord, RecordSnapshot};
use crate::Result;

/// Payload sent when saving a custom login message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub id: CommunityId,
    pub message: Option<String>,
}

/// A rejected save or toggle call.
///
/// Displays as the raw detail reported by the transport so it can be shown to
/// the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct SaveError {
    detail: String,
}

impl SaveError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<crate::Error> for SaveError {
    fn from(error: crate::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// Source of community records
#[allow(async_fn_in_trait)]
pub trait RemoteRecordSource {
    /// Fetch the community, `Ok(None)` when it does not exist
    async fn fetch(&self, community: &CommunityId) -> Result<Option<CommunityRecord>>;
}

/// Persists a custom login message
#[allow(async_fn_in_trait)]
pub trait SaveService {
    async fn save(&self, request: &SaveRequest) -> std::result::Result<(), SaveError>;
}

/// Persists the branded login enabled flag, independently of the message
#[allow(async_fn_in_trait)]
pub trait ToggleService {
    /// Returns the settings as stored after the change
    async fn set_enabled(
        &self,
        community: &CommunityId,
        enabled: bool,
    ) -> std::result::Result<BrandedLogin, SaveError>;
}

impl<T: RemoteRecordSource> RemoteRecordSource for Arc<T> {
    async fn fetch(&self, community: &CommunityId) -> Result<Option<CommunityRecord>> {
        (**self).fetch(community).await
    }
}

impl<T: SaveService> SaveService for Arc<T> {
    async fn save(&self, request: &SaveRequest) -> std::result::Result<(), SaveError> {
        (**self).save(request).await
    }
}

impl<T: ToggleService> ToggleService for Arc<T> {
    async fn set_enabled(
        &self,
        community: &CommunityId,
        enabled: bool,
    ) -> std::result::Result<BrandedLogin, SaveError> {
        (**self).set_enabled(community, enabled).await
    }
}

/// Load a community and fold the outcome into a snapshot.
///
/// Load failures end in the empty state; the panel has no error view of its
/// own, so the failure is only logged.
pub async fn load_snapshot<R: RemoteRecordSource>(
    source: &R,
    community: &CommunityId,
) -> RecordSnapshot {
    match source.fetch(community).await {
        Ok(Some(record)) => {
            tracing::debug!("Loaded community {} ({})", record.slug, record.id);
            RecordSnapshot::loaded(record)
        }
        Ok(None) => {
            tracing::warn!("Community {} not found", community);
            RecordSnapshot::empty()
        }
        Err(error) => {
            tracing::error!("Failed to load community {}: {}", community, error);
            RecordSnapshot::empty()
        }
    }
}
