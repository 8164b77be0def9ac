use crate::repositories::assets::AssetStore;
use crate::repositories::settings::SettingsStore;
use crate::usecases::config_cache::ConfigCache;

/// Handles every usecase reaches the stores and the shared cache through.
pub trait Context: Sync + Send {
    fn settings_store(&self) -> &dyn SettingsStore;
    fn asset_store(&self) -> &dyn AssetStore;
    fn config(&self) -> &ConfigCache;
}
