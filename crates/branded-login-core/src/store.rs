//! Local JSON file of community records.
//!
//! Stands in for the remote API when working offline or in tests. Every
//! change reads the file, applies itself, and writes it back while holding
//! the store's write lock; clones of a store share that lock. Writes go to a
//! sibling temp file that is renamed over the target, so readers never see a
//! half-written file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::{BrandedLogin, CommunityId, CommunityRecord};
use crate::services::{RemoteRecordSource, SaveError, SaveRequest, SaveService, ToggleService};

const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
struct StoreFile {
    #[serde(default = "default_store_version")]
    version: u32,
    #[serde(default)]
    communities: Vec<CommunityRecord>,
}

const fn default_store_version() -> u32 {
    STORE_VERSION
}

/// File-backed community records
#[derive(Debug, Clone)]
pub struct LocalCommunityStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalCommunityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All communities, in insertion order. A missing file is an empty store.
    pub async fn list(&self) -> Result<Vec<CommunityRecord>> {
        Ok(self.read().await?.communities)
    }

    /// Find a community by id or slug.
    pub async fn find(&self, key: &str) -> Result<Option<CommunityRecord>> {
        let key = key.trim();
        Ok(self
            .read()
            .await?
            .communities
            .into_iter()
            .find(|record| record.id.as_str() == key || record.slug == key))
    }

    /// Create a community with branded login off.
    pub async fn create(&self, slug: &str) -> Result<CommunityRecord> {
        let slug = slug.trim();
        if slug.is_empty() || slug.contains('/') {
            return Err(Error::InvalidInput(format!("invalid community slug '{slug}'")));
        }

        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        if file.communities.iter().any(|record| record.slug == slug) {
            return Err(Error::InvalidInput(format!(
                "community '{slug}' already exists"
            )));
        }

        let record = CommunityRecord::new(CommunityId::generate(), slug);
        file.communities.push(record.clone());
        self.write(&file).await?;
        tracing::info!("Created community {} ({})", record.slug, record.id);
        Ok(record)
    }

    async fn update_branded_login(
        &self,
        community: &CommunityId,
        apply: impl FnOnce(&mut BrandedLogin),
    ) -> Result<BrandedLogin> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        let record = file
            .communities
            .iter_mut()
            .find(|record| &record.id == community)
            .ok_or_else(|| Error::NotFound(community.to_string()))?;
        apply(&mut record.branded_login);
        let settings = record.branded_login.clone();
        self.write(&file).await?;
        Ok(settings)
    }

    async fn read(&self) -> Result<StoreFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(error) => Err(error.into()),
        }
    }

    async fn write(&self, file: &StoreFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let serialized = serde_json::to_string_pretty(file)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, serialized).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("communities"), ToOwned::to_owned);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RemoteRecordSource for LocalCommunityStore {
    async fn fetch(&self, community: &CommunityId) -> Result<Option<CommunityRecord>> {
        self.find(community.as_str()).await
    }
}

impl SaveService for LocalCommunityStore {
    async fn save(&self, request: &SaveRequest) -> std::result::Result<(), SaveError> {
        let message = request.message.clone();
        self.update_branded_login(&request.id, |settings| settings.message = message)
            .await?;
        Ok(())
    }
}

impl ToggleService for LocalCommunityStore {
    async fn set_enabled(
        &self,
        community: &CommunityId,
        enabled: bool,
    ) -> std::result::Result<BrandedLogin, SaveError> {
        Ok(self
            .update_branded_login(community, |settings| settings.is_enabled = enabled)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> LocalCommunityStore {
        LocalCommunityStore::new(dir.path().join("nested").join("communities.json"))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.find("spectrum").await.unwrap(), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_then_find_by_slug_or_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let created = store.create("spectrum").await.unwrap();
        assert!(!created.branded_login.is_enabled);

        assert_eq!(store.find("spectrum").await.unwrap(), Some(created.clone()));
        assert_eq!(
            store.find(created.id.as_str()).await.unwrap(),
            Some(created.clone())
        );
        assert_eq!(store.fetch(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn create_rejects_duplicates_and_bad_slugs() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("spectrum").await.unwrap();
        assert!(store.create("spectrum").await.is_err());
        assert!(store.create("  ").await.is_err());
        assert!(store.create("a/b").await.is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn save_and_toggle_persist_independently() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let created = store.create("spectrum").await.unwrap();

        store.set_enabled(&created.id, true).await.unwrap();
        store
            .save(&SaveRequest {
                id: created.id.clone(),
                message: Some("Welcome!".to_string()),
            })
            .await
            .unwrap();

        let reopened = LocalCommunityStore::new(store.path());
        let record = reopened.find("spectrum").await.unwrap().unwrap();
        assert_eq!(
            record.branded_login,
            BrandedLogin {
                is_enabled: true,
                message: Some("Welcome!".to_string()),
            }
        );

        let settings = reopened.set_enabled(&created.id, false).await.unwrap();
        assert_eq!(settings.message.as_deref(), Some("Welcome!"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn overlapping_save_and_toggle_both_persist() {
        for round in 0..50 {
            let dir = tempfile::tempdir().unwrap();
            let store = store_in(&dir);
            let created = store.create("spectrum").await.unwrap();
            let request = SaveRequest {
                id: created.id.clone(),
                message: Some(format!("message {round}")),
            };

            let (saved, toggled) = if round % 2 == 0 {
                tokio::join!(store.save(&request), store.set_enabled(&created.id, true))
            } else {
                let (toggled, saved) =
                    tokio::join!(store.set_enabled(&created.id, true), store.save(&request));
                (saved, toggled)
            };
            saved.unwrap();
            toggled.unwrap();

            let record = store.find("spectrum").await.unwrap().unwrap();
            assert_eq!(
                record.branded_login,
                BrandedLogin {
                    is_enabled: true,
                    message: request.message.clone(),
                },
                "round {round}"
            );
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn clones_share_the_write_lock() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let created = store.create("spectrum").await.unwrap();
        let other = store.clone();

        let request = SaveRequest {
            id: created.id.clone(),
            message: Some("Welcome!".to_string()),
        };
        let (saved, toggled) =
            tokio::join!(store.save(&request), other.set_enabled(&created.id, true));
        saved.unwrap();
        toggled.unwrap();

        let record = other.find(created.id.as_str()).await.unwrap().unwrap();
        assert!(record.branded_login.is_enabled);
        assert_eq!(record.branded_login.message.as_deref(), Some("Welcome!"));
        assert!(!dir.path().join("nested").join("communities.json.tmp").exists());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn save_for_unknown_community_fails_with_detail() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let error = store
            .save(&SaveRequest {
                id: "missing".parse().unwrap(),
                message: None,
            })
            .await
            .unwrap_err();
        assert_eq!(error.detail(), "Community not found: missing");
    }
}
