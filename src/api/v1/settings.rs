use crate::api::RequestContext;
use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResponse, ServiceResult};
use crate::models::api::{SettingsResponse, UpdateSettingsArgs, UploadLogoArgs};
use crate::models::assets::LogoFile;
use crate::models::notifications::Notification;
use crate::models::settings::ConfigSnapshot;
use crate::usecases::settings_editor::SettingsEditor;
use axum::Json;
use axum::body::Bytes;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

pub async fn fetch(ctx: RequestContext) -> ServiceResponse<ConfigSnapshot> {
    let snapshot = ctx.config().current();
    Ok(Json(ConfigSnapshot::clone(&snapshot)))
}

pub async fn update(
    ctx: RequestContext,
    args: Result<Json<UpdateSettingsArgs>, JsonRejection>,
) -> ServiceResult<Response> {
    let Json(args) = args.map_err(|_| AppError::DecodingRequestFailed)?;
    let mut editor = SettingsEditor::open_loaded(&ctx).await?;
    if let Some(system_name) = args.system_name {
        editor.set_system_name(system_name);
    }
    if let Some(primary_color) = args.primary_color {
        editor.set_primary_color(primary_color);
    }
    if let Some(secondary_color) = args.secondary_color {
        editor.set_secondary_color(secondary_color);
    }
    if args.remove_logo {
        editor.request_logo_removal();
    }
    let notification = editor.commit(&ctx).await;
    Ok(editor_response(&ctx, &editor, notification))
}

pub async fn upload_logo(
    ctx: RequestContext,
    args: Result<Query<UploadLogoArgs>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> ServiceResult<Response> {
    let Query(args) = args.map_err(|_| AppError::DecodingRequestFailed)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let file = LogoFile::new(args.file_name, content_type, body.to_vec());

    let mut editor = SettingsEditor::open_loaded(&ctx).await?;
    if let Err(e) = editor.stage_logo(file) {
        let notification = Notification::error(&e);
        return Ok(respond(&ctx, e.http_status_code(), notification));
    }
    let notification = editor.commit(&ctx).await;
    Ok(editor_response(&ctx, &editor, notification))
}

pub async fn remove_logo(ctx: RequestContext) -> ServiceResult<Response> {
    let mut editor = SettingsEditor::open_loaded(&ctx).await?;
    editor.request_logo_removal();
    let notification = editor.commit(&ctx).await;
    Ok(editor_response(&ctx, &editor, notification))
}

pub async fn refresh(ctx: RequestContext) -> ServiceResult<Json<ConfigSnapshot>> {
    let snapshot = ctx.config().try_refresh().await?;
    Ok(Json(ConfigSnapshot::clone(&snapshot)))
}

fn editor_response(
    ctx: &RequestContext,
    editor: &SettingsEditor,
    notification: Notification,
) -> Response {
    let status = editor
        .failure()
        .map(|e| e.http_status_code())
        .unwrap_or(StatusCode::OK);
    respond(ctx, status, notification)
}

fn respond(ctx: &RequestContext, status: StatusCode, notification: Notification) -> Response {
    let settings = ConfigSnapshot::clone(&ctx.config().current());
    let body = SettingsResponse {
        notification: Some(notification),
        settings,
    };
    (status, Json(body)).into_response()
}
