use crate::models::notifications::Notification;
use crate::models::settings::ConfigSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsArgs {
    pub system_name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub remove_logo: bool,
}

#[derive(Debug, Deserialize)]
pub struct UploadLogoArgs {
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub notification: Option<Notification>,
    pub settings: ConfigSnapshot,
}
