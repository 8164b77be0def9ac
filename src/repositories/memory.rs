//! Process-local stores for the `memory` backend and for tests.

use crate::models::assets::{Asset, AssetLocator};
use crate::models::settings::{SettingEntry, SettingKey};
use crate::repositories::assets::AssetStore;
use crate::repositories::settings::{SettingsStore, UpsertFailure};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySettingsStore {
    entries: RwLock<HashMap<SettingKey, SettingEntry>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn get(&self, key: SettingKey) -> Option<SettingEntry> {
        self.entries.read().await.get(&key).cloned()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn fetch_all(&self) -> anyhow::Result<Vec<SettingEntry>> {
        let entries = self.entries.read().await;
        let mut entries: Vec<SettingEntry> = entries.values().cloned().collect();
        entries.sort_by_key(|entry| entry.key.as_str());
        Ok(entries)
    }

    async fn upsert_many(&self, entries: &[SettingEntry]) -> Result<(), UpsertFailure> {
        let mut stored = self.entries.write().await;
        for entry in entries {
            let entry = SettingEntry {
                updated_at: Utc::now(),
                ..entry.clone()
            };
            stored.insert(entry.key, entry);
        }
        Ok(())
    }
}

pub struct InMemoryAssetStore {
    locator: AssetLocator,
    objects: RwLock<HashMap<String, Asset>>,
}

impl InMemoryAssetStore {
    pub fn new(locator: AssetLocator) -> Self {
        Self {
            locator,
            objects: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    fn locator(&self) -> &AssetLocator {
        &self.locator
    }

    async fn upload(&self, asset: &Asset, upsert: bool) -> anyhow::Result<()> {
        let mut objects = self.objects.write().await;
        if !upsert && objects.contains_key(&asset.path) {
            anyhow::bail!("asset already exists: {}", asset.path);
        }
        objects.insert(asset.path.clone(), asset.clone());
        Ok(())
    }

    async fn fetch(&self, path: &str) -> anyhow::Result<Option<Asset>> {
        Ok(self.objects.read().await.get(path).cloned())
    }

    async fn uploaded_at(&self, path: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        let objects = self.objects.read().await;
        Ok(objects.get(path).map(|asset| asset.uploaded_at))
    }

    async fn remove(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<String>> {
        let mut paths: Vec<String> = self.objects.read().await.keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }
}
