use crate::common::context::Context;
use crate::common::error::AppError;
use crate::common::init;
use crate::common::state::AppState;
use crate::models::assets::MAX_LOGO_SIZE;
use crate::repositories::assets::AssetStore;
use crate::repositories::settings::SettingsStore;
use crate::settings::AppSettings;
use crate::usecases::config_cache::ConfigCache;
use crate::workers::daemons::config_refresh;
use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRequestParts};
use axum::http::request::Parts;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub mod assets;
pub mod v1;

/// Leaves room above the logo limit so oversized uploads reach validation.
const BODY_LIMIT: usize = MAX_LOGO_SIZE + 1024 * 1024;

pub struct RequestContext {
    pub settings: Arc<dyn SettingsStore>,
    pub assets: Arc<dyn AssetStore>,
    pub config: Arc<ConfigCache>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/assets/{bucket}/{*path}", get(assets::fetch))
        .nest("/api/v1", v1::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

pub async fn index() -> &'static str {
    "Running branding-service v0.1"
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = init::initialize_state(settings).await?;
    let subscription = state.config.subscribe(|snapshot| {
        info!(
            system_name = %snapshot.system_name,
            logo_url = ?snapshot.logo_url,
            "Published system settings"
        );
    });

    let refresher = settings
        .config_refresh_interval
        .map(|interval| tokio::spawn(config_refresh::serve(state.config.clone(), interval)));

    let listener = TcpListener::bind((settings.app_host, settings.app_port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router().with_state(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(refresher) = refresher {
        refresher.abort();
    }
    state.config.unsubscribe(subscription);
    state.config.close();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            settings: state.settings.clone(),
            assets: state.assets.clone(),
            config: state.config.clone(),
        })
    }
}

impl Context for RequestContext {
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
