use crate::common::env::FromEnv;
use std::env;
use std::net::IpAddr;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Settings in MySQL, assets in redis
    MySqlRedis,
    /// Everything in process memory, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use std::io::{Error, ErrorKind};

        match s {
            "mysql-redis" => Ok(StorageBackend::MySqlRedis),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(Error::new(ErrorKind::InvalidInput, "unknown storage backend")),
        }
    }
}

pub struct DatabaseSettings {
    pub database_url: String,
    pub db_max_connections: usize,
    pub db_wait_timeout: Duration,
}

pub struct RedisSettings {
    pub redis_url: String,
    pub redis_max_connections: usize,
    pub redis_connection_timeout: Duration,
    pub redis_response_timeout: Duration,
    pub redis_wait_timeout: Duration,
}

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,

    pub storage_backend: StorageBackend,
    pub database: Option<DatabaseSettings>,
    pub redis: Option<RedisSettings>,

    pub assets_public_base_url: String,
    pub config_refresh_interval: Option<Duration>,
}

impl DatabaseSettings {
    fn load_from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let db_max_connections = usize::from_env("DB_MAX_CONNECTIONS")?;
        let db_wait_timeout_secs = u64::from_env("DB_WAIT_TIMEOUT_SECS")?;
        let db_wait_timeout = Duration::from_secs(db_wait_timeout_secs);
        Ok(DatabaseSettings {
            database_url,
            db_max_connections,
            db_wait_timeout,
        })
    }
}

impl RedisSettings {
    fn load_from_env() -> anyhow::Result<Self> {
        let redis_url = env::var("REDIS_URL")?;
        let redis_max_connections = usize::from_env("REDIS_MAX_CONNECTIONS")?;
        let redis_connection_timeout_secs = u64::from_env("REDIS_CONNECTION_TIMEOUT_SECS")?;
        let redis_connection_timeout = Duration::from_secs(redis_connection_timeout_secs);
        let redis_response_timeout_secs = u64::from_env("REDIS_RESPONSE_TIMEOUT_SECS")?;
        let redis_response_timeout = Duration::from_secs(redis_response_timeout_secs);
        let redis_wait_timeout_secs = u64::from_env("REDIS_WAIT_TIMEOUT_SECS")?;
        let redis_wait_timeout = Duration::from_secs(redis_wait_timeout_secs);
        Ok(RedisSettings {
            redis_url,
            redis_max_connections,
            redis_connection_timeout,
            redis_response_timeout,
            redis_wait_timeout,
        })
    }
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = env::var("APP_COMPONENT")?;
        let level = Level::from_env("LOG_LEVEL")?;
        let app_host = IpAddr::from_env("APP_HOST")?;
        let app_port = u16::from_env("APP_PORT")?;

        let storage_backend = StorageBackend::from_env("STORAGE_BACKEND")?;
        let (database, redis) = match storage_backend {
            StorageBackend::MySqlRedis => (
                Some(DatabaseSettings::load_from_env()?),
                Some(RedisSettings::load_from_env()?),
            ),
            StorageBackend::Memory => (None, None),
        };

        let assets_public_base_url = env::var("ASSETS_PUBLIC_BASE_URL")?;
        let config_refresh_interval = u64::from_env_opt("CONFIG_REFRESH_INTERVAL_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(AppSettings {
            app_component,
            level,
            app_host,
            app_port,

            storage_backend,
            database,
            redis,

            assets_public_base_url,
            config_refresh_interval,
        })
    }

    pub fn get() -> &'static AppSettings {
        settings()
    }
}

pub fn settings() -> &'static AppSettings {
    static SETTINGS: LazyLock<AppSettings> =
        LazyLock::new(|| AppSettings::load_from_env().expect("Failed to load settings"));
    SETTINGS.deref()
}
