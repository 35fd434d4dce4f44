use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::typedid::{TypedId, TypedIdMarker};
use crate::user::UserId;

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type NotificationId = TypedId<Notification>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Who a notification is shown to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TargetAudience {
    #[default]
    All,
    User,
}

#[derive(Clone, Debug, FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: Option<UserId>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub target_audience: TargetAudience,
    pub scheduled_for: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Notification {
    fn tag() -> &'static str {
        "NTF"
    }
}

#[derive(Clone, Debug)]
pub struct NotificationFields {
    pub user_id: Option<UserId>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub target_audience: TargetAudience,
    pub scheduled_for: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}
