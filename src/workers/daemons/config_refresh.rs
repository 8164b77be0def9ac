use crate::usecases::config_cache::ConfigCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Periodically refreshes the cache so saves made by other processes
/// reach this one. Failed refreshes keep the last snapshot and are retried
/// on the next tick.
pub async fn serve(config: Arc<ConfigCache>, interval: Duration) {
    info!("Refreshing system settings every {interval:?}");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately and startup already refreshed
    ticker.tick().await;
    loop {
        ticker.tick().await;
        config.refresh().await;
    }
}
