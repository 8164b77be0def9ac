use crate::entities::settings::SettingRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_SYSTEM_NAME: &str = "Party Member Management System";
pub const DEFAULT_PRIMARY_COLOR: &str = "#2563eb";
pub const DEFAULT_SECONDARY_COLOR: &str = "#64748b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    LogoUrl,
    SystemName,
    PrimaryColor,
    SecondaryColor,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::LogoUrl,
        SettingKey::SystemName,
        SettingKey::PrimaryColor,
        SettingKey::SecondaryColor,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SettingKey::LogoUrl => "logo_url",
            SettingKey::SystemName => "system_name",
            SettingKey::PrimaryColor => "primary_color",
            SettingKey::SecondaryColor => "secondary_color",
        }
    }

    pub const fn is_nullable(&self) -> bool {
        matches!(self, SettingKey::LogoUrl)
    }
}

impl Display for SettingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SettingKey {
    type Error = std::io::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        use std::io::{Error, ErrorKind};

        match value {
            "logo_url" => Ok(SettingKey::LogoUrl),
            "system_name" => Ok(SettingKey::SystemName),
            "primary_color" => Ok(SettingKey::PrimaryColor),
            "secondary_color" => Ok(SettingKey::SecondaryColor),
            _ => Err(Error::new(ErrorKind::InvalidData, "unknown setting key")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEntry {
    pub key: SettingKey,
    pub value: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SettingRow> for SettingEntry {
    type Error = std::io::Error;

    fn try_from(row: SettingRow) -> Result<Self, Self::Error> {
        let key = SettingKey::try_from(row.key.as_str())?;
        Ok(Self {
            key,
            value: row.value,
            updated_at: row.updated_at,
        })
    }
}

impl From<&SettingEntry> for SettingRow {
    fn from(entry: &SettingEntry) -> Self {
        Self {
            key: entry.key.as_str().to_string(),
            value: entry.value.clone(),
            updated_at: entry.updated_at,
        }
    }
}

/// The branding configuration every screen renders from.
///
/// Snapshots are rebuilt wholesale on each refresh and shared behind an `Arc`;
/// nothing mutates a published snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub logo_url: Option<String>,
    pub system_name: String,
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            logo_url: None,
            system_name: DEFAULT_SYSTEM_NAME.to_string(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
        }
    }
}

impl ConfigSnapshot {
    /// Builds a snapshot from stored entries, substituting defaults for
    /// missing or empty values.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a SettingEntry>,
    {
        let mut snapshot = ConfigSnapshot::default();
        for entry in entries {
            let value = match entry.value.as_deref() {
                Some(value) if !value.trim().is_empty() => value.to_string(),
                _ => {
                    snapshot.reset(entry.key);
                    continue;
                }
            };
            match entry.key {
                SettingKey::LogoUrl => snapshot.logo_url = Some(value),
                SettingKey::SystemName => snapshot.system_name = value,
                SettingKey::PrimaryColor => snapshot.primary_color = value,
                SettingKey::SecondaryColor => snapshot.secondary_color = value,
            }
        }
        snapshot
    }

    /// One entry per [`SettingKey`], all stamped with the same write time.
    pub fn to_entries(&self, updated_at: DateTime<Utc>) -> Vec<SettingEntry> {
        SettingKey::ALL
            .into_iter()
            .map(|key| SettingEntry {
                key,
                value: self.value(key).map(str::to_string),
                updated_at,
            })
            .collect()
    }

    pub fn value(&self, key: SettingKey) -> Option<&str> {
        match key {
            SettingKey::LogoUrl => self.logo_url.as_deref(),
            SettingKey::SystemName => Some(&self.system_name),
            SettingKey::PrimaryColor => Some(&self.primary_color),
            SettingKey::SecondaryColor => Some(&self.secondary_color),
        }
    }

    fn reset(&mut self, key: SettingKey) {
        match key {
            SettingKey::LogoUrl => self.logo_url = None,
            SettingKey::SystemName => self.system_name = DEFAULT_SYSTEM_NAME.to_string(),
            SettingKey::PrimaryColor => self.primary_color = DEFAULT_PRIMARY_COLOR.to_string(),
            SettingKey::SecondaryColor => {
                self.secondary_color = DEFAULT_SECONDARY_COLOR.to_string()
            }
        }
    }
}
