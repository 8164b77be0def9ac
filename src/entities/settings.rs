use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct SettingRow {
    pub key: String,
    pub value: Option<String>,
    pub updated_at: DateTime<Utc>,
}
