use crate::api::RequestContext;
use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, assets_store_unavailable};
use axum::extract::Path;
use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Serves stored objects so public logo locators resolve.
pub async fn fetch(
    ctx: RequestContext,
    Path((bucket, path)): Path<(String, String)>,
) -> ServiceResult<Response> {
    let store = ctx.asset_store();
    if bucket != store.locator().bucket() {
        return Err(AppError::AssetsNotFound);
    }
    let asset = match store.fetch(&path).await {
        Ok(Some(asset)) => asset,
        Ok(None) => return Err(AppError::AssetsNotFound),
        Err(e) => return assets_store_unavailable(e),
    };
    let headers = [
        (header::CONTENT_TYPE, asset.content_type),
        (header::CACHE_CONTROL, "no-cache".to_string()),
    ];
    Ok((headers, asset.bytes).into_response())
}
