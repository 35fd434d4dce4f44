use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::user::UserId;
use crate::utils::{default_true, optional_text, require_text, MessageBody};

use super::{
    manager, Notification, NotificationFields, NotificationId, NotificationKind, TargetAudience,
};

const DEFAULT_LIFETIME_DAYS: i64 = 30;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveNotificationBody {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub target_audience: TargetAudience,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SaveNotificationBody {
    fn into_fields(self) -> Result<NotificationFields, Error> {
        let scheduled_for = self.scheduled_for.unwrap_or_else(Utc::now);

        Ok(NotificationFields {
            user_id: optional_text(self.user_id).map(UserId::new),
            title: require_text("title", self.title)?,
            message: require_text("message", self.message)?,
            kind: self.kind,
            target_audience: self.target_audience,
            scheduled_for,
            expires_at: self
                .expires_at
                .unwrap_or(scheduled_for + Duration::days(DEFAULT_LIFETIME_DAYS)),
            is_active: self.is_active,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationBody {
    pub id: NotificationId,
    pub user_id: Option<UserId>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub target_audience: TargetAudience,
    pub scheduled_for: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationBody {
    pub fn render(notification: Notification) -> NotificationBody {
        NotificationBody {
            id: notification.id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            target_audience: notification.target_audience,
            scheduled_for: notification.scheduled_for,
            expires_at: notification.expires_at,
            is_active: notification.is_active,
            is_read: notification.is_read,
            created_at: notification.created_at,
            updated_at: notification.updated_at,
        }
    }
}

fn render_all(notifications: Vec<Notification>) -> Vec<NotificationBody> {
    notifications
        .into_iter()
        .map(NotificationBody::render)
        .collect()
}

#[get("/api/notifications")]
#[tracing::instrument(skip(db))]
pub async fn get_notifications(
    db: Data<Box<dyn Database>>,
) -> Result<Json<Vec<NotificationBody>>, Error> {
    let notifications = manager::get_notifications(&***db).await?;

    Ok(Json(render_all(notifications)))
}

#[get("/api/notifications/{user_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_notifications_for_user(
    db: Data<Box<dyn Database>>,
    params: Path<UserId>,
) -> Result<Json<Vec<NotificationBody>>, Error> {
    let user_id = params.into_inner();

    let notifications = manager::get_notifications_for_user(&***db, &user_id).await?;

    Ok(Json(render_all(notifications)))
}

#[post("/api/notifications")]
#[tracing::instrument(skip(db))]
pub async fn create_notification(
    db: Data<Box<dyn Database>>,
    body: Json<SaveNotificationBody>,
) -> Result<HttpResponse, Error> {
    let fields = body.into_inner().into_fields()?;

    let notification = manager::create_notification(&***db, fields).await?;

    Ok(HttpResponse::Created().json(NotificationBody::render(notification)))
}

#[put("/api/notifications/{notification_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_notification(
    db: Data<Box<dyn Database>>,
    params: Path<NotificationId>,
    body: Json<SaveNotificationBody>,
) -> Result<Json<NotificationBody>, Error> {
    let notification_id = params.into_inner();
    let fields = body.into_inner().into_fields()?;

    let notification = manager::update_notification(&***db, notification_id, fields).await?;

    Ok(Json(NotificationBody::render(notification)))
}

#[delete("/api/notifications/{notification_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_notification(
    db: Data<Box<dyn Database>>,
    params: Path<NotificationId>,
) -> Result<Json<MessageBody>, Error> {
    let notification_id = params.into_inner();

    manager::delete_notification(&***db, notification_id).await?;

    Ok(Json(MessageBody::new("Notification deleted successfully")))
}

#[put("/api/notifications/{notification_id}/read")]
#[tracing::instrument(skip(db))]
pub async fn mark_notification_read(
    db: Data<Box<dyn Database>>,
    params: Path<NotificationId>,
) -> Result<Json<NotificationBody>, Error> {
    let notification_id = params.into_inner();

    let notification = manager::mark_read(&***db, notification_id).await?;

    Ok(Json(NotificationBody::render(notification)))
}

#[put("/api/notifications/{user_id}/read-all")]
#[tracing::instrument(skip(db))]
pub async fn mark_all_notifications_read(
    db: Data<Box<dyn Database>>,
    params: Path<UserId>,
) -> Result<Json<Vec<NotificationBody>>, Error> {
    let user_id = params.into_inner();

    let notifications = manager::mark_all_read(&***db, &user_id).await?;

    Ok(Json(render_all(notifications)))
}
