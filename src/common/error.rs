use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[track_caller]
pub fn settings_store_unavailable<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("Settings store unavailable at {caller}: {}", e.into());
    Err(AppError::SettingsStoreUnavailable)
}

#[track_caller]
pub fn assets_store_unavailable<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("Asset store unavailable at {caller}: {}", e.into());
    Err(AppError::AssetsStoreUnavailable)
}

#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    Unexpected,
    DecodingRequestFailed,

    AssetsInvalidContentType,
    AssetsTooLarge,
    AssetsNotFound,
    AssetsStoreUnavailable,

    SettingsStoreUnavailable,
    /// Some, but not all, settings were written before the store failed
    SettingsPartiallyCommitted,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        match unexpected::<(), E>(e) {
            Ok(()) => AppError::Unexpected,
            Err(e) => e,
        }
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::DecodingRequestFailed => "decoding_request_failed",

            AppError::AssetsInvalidContentType => "assets.invalid_content_type",
            AppError::AssetsTooLarge => "assets.too_large",
            AppError::AssetsNotFound => "assets.not_found",
            AppError::AssetsStoreUnavailable => "assets.store_unavailable",

            AppError::SettingsStoreUnavailable => "settings.store_unavailable",
            AppError::SettingsPartiallyCommitted => "settings.partially_committed",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::DecodingRequestFailed => "Failed to decode request",

            AppError::AssetsInvalidContentType => "Please select an image file",
            AppError::AssetsTooLarge => "File size must be less than 5MB",
            AppError::AssetsNotFound => "Asset not found",
            AppError::AssetsStoreUnavailable => "Failed to upload logo",

            AppError::SettingsStoreUnavailable | AppError::SettingsPartiallyCommitted => {
                "Failed to save settings"
            }
        }
    }

    /// Client-side validation failures; these never touch a store.
    pub const fn is_invalid_asset(&self) -> bool {
        matches!(
            self,
            AppError::AssetsInvalidContentType | AppError::AssetsTooLarge
        )
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed => StatusCode::BAD_REQUEST,

            AppError::AssetsInvalidContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::AssetsTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::AssetsNotFound => StatusCode::NOT_FOUND,

            AppError::AssetsStoreUnavailable | AppError::SettingsStoreUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            AppError::Unexpected | AppError::SettingsPartiallyCommitted => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub const fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            code: self.code(),
            message: self.message(),
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}
