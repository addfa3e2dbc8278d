use crate::model::NotificationId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What triggered a staff notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    Preparing,
    Completed,
}

/// A staff-facing log entry produced by the order lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        message: impl Into<String>,
        kind: NotificationKind,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            kind,
            timestamp,
            read: false,
        }
    }
}
