pub mod settings;

use crate::common::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(settings::fetch).put(settings::update),
        )
        .route(
            "/settings/logo",
            post(settings::upload_logo).delete(settings::remove_logo),
        )
        .route("/settings/refresh", post(settings::refresh))
}
