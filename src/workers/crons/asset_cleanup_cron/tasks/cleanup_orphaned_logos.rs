use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::models::assets::ORPHAN_GRACE_PERIOD_MINUTES;
use crate::usecases::logo;
use chrono::{TimeDelta, Utc};
use tracing::info;

/// Deletes logo objects left behind by interrupted replacements.
/// Returns how many objects were removed.
pub async fn cleanup_orphaned_logos<C: Context>(ctx: &C) -> ServiceResult<usize> {
    let uploaded_before = Utc::now() - TimeDelta::minutes(ORPHAN_GRACE_PERIOD_MINUTES);
    let snapshot = ctx.config().try_refresh().await?;
    let removed = logo::remove_orphans(ctx, snapshot.logo_url.as_deref(), uploaded_before).await?;
    for path in &removed {
        info!(path = %path, "Removed orphaned logo");
    }
    Ok(removed.len())
}
