use crate::entities::settings::SettingRow;
use crate::models::settings::SettingEntry;
use async_trait::async_trait;
use sqlx::{MySql, Pool};
use tracing::warn;

/// Returned by [`SettingsStore::upsert_many`] when a write fails.
/// Entries before `written` are already committed.
#[derive(Debug)]
pub struct UpsertFailure {
    pub written: usize,
    pub error: anyhow::Error,
}

impl UpsertFailure {
    pub fn is_partial(&self) -> bool {
        self.written > 0
    }
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn fetch_all(&self) -> anyhow::Result<Vec<SettingEntry>>;

    /// Writes each entry keyed by its [`SettingKey`](crate::models::settings::SettingKey),
    /// in order, with no transaction spanning the batch.
    async fn upsert_many(&self, entries: &[SettingEntry]) -> Result<(), UpsertFailure>;
}

pub struct MySqlSettingsStore {
    db: Pool<MySql>,
}

impl MySqlSettingsStore {
    pub fn new(db: Pool<MySql>) -> Self {
        Self { db }
    }

    pub async fn create_table(&self) -> sqlx::Result<()> {
        const QUERY: &str = "CREATE TABLE IF NOT EXISTS settings (
            `key` VARCHAR(64) NOT NULL PRIMARY KEY,
            value TEXT NULL,
            updated_at DATETIME(6) NOT NULL
        )";
        sqlx::query(QUERY).execute(&self.db).await?;
        Ok(())
    }

    async fn upsert(&self, row: SettingRow) -> sqlx::Result<()> {
        const QUERY: &str = "INSERT INTO settings (`key`, value, updated_at) VALUES (?, ?, ?) \
            ON DUPLICATE KEY UPDATE value = VALUES(value), updated_at = VALUES(updated_at)";
        sqlx::query(QUERY)
            .bind(row.key)
            .bind(row.value)
            .bind(row.updated_at)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MySqlSettingsStore {
    async fn fetch_all(&self) -> anyhow::Result<Vec<SettingEntry>> {
        const QUERY: &str = "SELECT `key`, value, updated_at FROM settings ORDER BY `key`";
        let rows: Vec<SettingRow> = sqlx::query_as(QUERY).fetch_all(&self.db).await?;
        Ok(into_entries(rows))
    }

    async fn upsert_many(&self, entries: &[SettingEntry]) -> Result<(), UpsertFailure> {
        for (written, entry) in entries.iter().enumerate() {
            if let Err(e) = self.upsert(SettingRow::from(entry)).await {
                return Err(UpsertFailure {
                    written,
                    error: e.into(),
                });
            }
        }
        Ok(())
    }
}

/// Rows with keys this service does not know are skipped.
pub fn into_entries(rows: Vec<SettingRow>) -> Vec<SettingEntry> {
    rows.into_iter()
        .filter_map(|row| {
            let key = row.key.clone();
            match SettingEntry::try_from(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(key = %key, "Skipping unknown setting: {e}");
                    None
                }
            }
        })
        .collect()
}
