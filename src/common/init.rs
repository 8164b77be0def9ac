use crate::common::redis_pool::{RedisPool, RedisPoolManager};
use crate::common::state::AppState;
use crate::models::assets::{AssetLocator, LOGO_BUCKET};
use crate::repositories::assets::RedisAssetStore;
use crate::repositories::settings::MySqlSettingsStore;
use crate::settings::{AppSettings, DatabaseSettings, RedisSettings, StorageBackend};
use deadpool::Runtime;
use redis::{AsyncConnectionConfig, Commands};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::{info, warn};

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        // .json()
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

/// Builds the stores for the configured backend and loads the first
/// configuration snapshot. A failed first load leaves the defaults published.
pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let state = match settings.storage_backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage, settings will not survive a restart");
            AppState::in_memory(&settings.assets_public_base_url)
        }
        StorageBackend::MySqlRedis => {
            let (Some(database), Some(redis)) = (&settings.database, &settings.redis) else {
                anyhow::bail!("mysql-redis backend requires database and redis settings");
            };
            let db = initialize_db(database).await?;
            let settings_store = MySqlSettingsStore::new(db);
            settings_store.create_table().await?;

            let redis = initialize_redis(redis)?;
            let locator = AssetLocator::new(&settings.assets_public_base_url, LOGO_BUCKET);
            let asset_store = RedisAssetStore::new(redis, locator);
            AppState::new(Arc::new(settings_store), Arc::new(asset_store))
        }
    };

    let snapshot = state.config.refresh().await;
    info!(
        loaded = state.config.is_loaded(),
        system_name = %snapshot.system_name,
        "Initialized system settings"
    );
    Ok(state)
}

pub fn initialize_db(
    settings: &DatabaseSettings,
) -> impl Future<Output = sqlx::Result<Pool<MySql>>> {
    MySqlPoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections as _)
        .connect(&settings.database_url)
}

pub fn initialize_redis(settings: &RedisSettings) -> anyhow::Result<RedisPool> {
    let redis_client = redis::Client::open(settings.redis_url.as_str())?;
    let mut conn = redis_client.get_connection_with_timeout(settings.redis_wait_timeout)?;
    let _: () = conn.ping()?;
    let redis_cfg = AsyncConnectionConfig::new()
        .set_connection_timeout(settings.redis_connection_timeout)
        .set_response_timeout(settings.redis_response_timeout);

    let redis_manager = RedisPoolManager::new(redis_client, redis_cfg);
    let redis = RedisPool::builder(redis_manager)
        .max_size(settings.redis_max_connections)
        .wait_timeout(Some(settings.redis_wait_timeout))
        .runtime(Runtime::Tokio1)
        .build()?;
    Ok(redis)
}
