use crate::common::error::AppError;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

pub const NOTIFICATION_DISPLAY_SECONDS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message shown to the user after an editor action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub code: Option<&'static str>,
    pub display_until: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            code: None,
            display_until: display_deadline(),
        }
    }

    pub fn error(e: &AppError) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: e.message().to_string(),
            code: Some(e.code()),
            display_until: display_deadline(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }

    pub fn is_visible_at(&self, at: DateTime<Utc>) -> bool {
        at < self.display_until
    }
}

fn display_deadline() -> DateTime<Utc> {
    Utc::now() + TimeDelta::seconds(NOTIFICATION_DISPLAY_SECONDS)
}
