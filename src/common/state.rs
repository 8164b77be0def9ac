use crate::common::context::Context;
use crate::models::assets::{AssetLocator, LOGO_BUCKET};
use crate::repositories::assets::AssetStore;
use crate::repositories::memory::{InMemoryAssetStore, InMemorySettingsStore};
use crate::repositories::settings::SettingsStore;
use crate::usecases::config_cache::ConfigCache;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<dyn SettingsStore>,
    pub assets: Arc<dyn AssetStore>,
    pub config: Arc<ConfigCache>,
}

impl AppState {
    pub fn new(settings: Arc<dyn SettingsStore>, assets: Arc<dyn AssetStore>) -> Self {
        let config = Arc::new(ConfigCache::new(settings.clone()));
        Self {
            settings,
            assets,
            config,
        }
    }

    pub fn in_memory(assets_public_base_url: &str) -> Self {
        let locator = AssetLocator::new(assets_public_base_url, LOGO_BUCKET);
        Self::new(
            Arc::new(InMemorySettingsStore::new()),
            Arc::new(InMemoryAssetStore::new(locator)),
        )
    }
}

impl Context for AppState {
    fn settings_store(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    fn asset_store(&self) -> &dyn AssetStore {
        self.assets.as_ref()
    }

    fn config(&self) -> &ConfigCache {
        &self.config
    }
}
