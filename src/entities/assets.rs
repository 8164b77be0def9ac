use crate::models::assets::Asset;
use chrono::{DateTime, Utc};

/// Field layout of a stored object hash in redis.
pub const CONTENT_TYPE_FIELD: &str = "content_type";
pub const BYTES_FIELD: &str = "bytes";
/// Unix milliseconds
pub const UPLOADED_AT_FIELD: &str = "uploaded_at";

#[derive(Debug)]
pub struct StoredObject {
    pub content_type: Option<String>,
    pub bytes: Option<Vec<u8>>,
    pub uploaded_at: Option<i64>,
}

impl StoredObject {
    /// `None` unless both content fields were present. Objects written
    /// without an upload time count as uploaded at the epoch.
    pub fn into_asset(self, path: &str) -> Option<Asset> {
        match (self.content_type, self.bytes) {
            (Some(content_type), Some(bytes)) => Some(Asset {
                path: path.to_string(),
                bytes,
                content_type,
                uploaded_at: uploaded_at_from_millis(self.uploaded_at),
            }),
            _ => None,
        }
    }
}

pub fn uploaded_at_from_millis(millis: Option<i64>) -> DateTime<Utc> {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
}
