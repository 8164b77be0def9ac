//! Lifecycle of the single logo asset: validation, replacement and removal.
//!
//! Removing a superseded logo is best-effort. Its outcome is reported as a
//! [`CleanupStatus`] and never fails the surrounding operation.

use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, assets_store_unavailable};
use crate::models::assets::{LogoFile, MAX_LOGO_SIZE, is_logo_path};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupStatus {
    /// No previous logo was known
    Skipped,
    Removed(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedLogo {
    pub locator: String,
    pub path: String,
    pub cleanup: CleanupStatus,
}

pub fn validate(file: &LogoFile) -> ServiceResult<()> {
    if !file.is_image() {
        return Err(AppError::AssetsInvalidContentType);
    }
    if file.size() > MAX_LOGO_SIZE {
        return Err(AppError::AssetsTooLarge);
    }
    Ok(())
}

/// Stores `file` as the logo and returns its public locator.
///
/// The logo at `current_logo_url` is deleted first so replaced logos never
/// accumulate; if the upload then fails, no logo exists until the next upload.
pub async fn upload<C: Context>(
    ctx: &C,
    file: LogoFile,
    current_logo_url: Option<&str>,
) -> ServiceResult<UploadedLogo> {
    validate(&file)?;

    let cleanup = remove_known(ctx, current_logo_url).await;

    let asset = file.into_asset();
    if let Err(e) = ctx.asset_store().upload(&asset, true).await {
        return assets_store_unavailable(e);
    }
    let locator = ctx.asset_store().public_url(&asset.path);
    info!(path = %asset.path, size = asset.bytes.len(), "Uploaded logo");
    Ok(UploadedLogo {
        locator,
        path: asset.path,
        cleanup,
    })
}

/// Deletes the logo at `current_logo_url`. The caller clears `logo_url`
/// whatever the outcome.
pub async fn remove<C: Context>(ctx: &C, current_logo_url: Option<&str>) -> CleanupStatus {
    remove_known(ctx, current_logo_url).await
}

/// Deletes every logo object in the bucket except the one `current_logo_url`
/// points to. Objects written after `uploaded_before` are left alone.
/// Returns the removed paths.
pub async fn remove_orphans<C: Context>(
    ctx: &C,
    current_logo_url: Option<&str>,
    uploaded_before: DateTime<Utc>,
) -> ServiceResult<Vec<String>> {
    let store = ctx.asset_store();
    let current_path = current_logo_url.and_then(|url| store.locator().path_of(url));
    let paths = match store.list().await {
        Ok(paths) => paths,
        Err(e) => return assets_store_unavailable(e),
    };

    let mut orphans = Vec::new();
    for path in paths {
        if !is_logo_path(&path) || Some(&path) == current_path.as_ref() {
            continue;
        }
        match store.uploaded_at(&path).await {
            Ok(Some(uploaded_at)) if uploaded_at <= uploaded_before => orphans.push(path),
            Ok(Some(_)) => info!(path = %path, "Skipping recently uploaded logo"),
            Ok(None) => {}
            Err(e) => return assets_store_unavailable(e),
        }
    }
    if orphans.is_empty() {
        return Ok(orphans);
    }
    match store.remove(&orphans).await {
        Ok(()) => Ok(orphans),
        Err(e) => assets_store_unavailable(e),
    }
}

async fn remove_known<C: Context>(ctx: &C, current_logo_url: Option<&str>) -> CleanupStatus {
    let store = ctx.asset_store();
    let Some(path) = current_logo_url.and_then(|url| store.locator().path_of(url)) else {
        return CleanupStatus::Skipped;
    };
    match store.remove(std::slice::from_ref(&path)).await {
        Ok(()) => CleanupStatus::Removed(path),
        Err(e) => {
            warn!(path = %path, "Failed to remove previous logo: {e}");
            CleanupStatus::Failed(path)
        }
    }
}
