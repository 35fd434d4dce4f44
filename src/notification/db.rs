use async_trait::async_trait;
use chrono::Utc;

use crate::database::SqliteNotificationStore;
use crate::error::Error;
use crate::user::UserId;

use super::{Notification, NotificationFields, NotificationId};

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, fields: &NotificationFields)
        -> Result<Notification, Error>;

    async fn fetch_notifications(&self) -> Result<Vec<Notification>, Error>;

    /// The user's own notifications together with those sent to everyone.
    async fn fetch_notifications_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, Error>;

    async fn update_notification(
        &self,
        notification_id: NotificationId,
        fields: &NotificationFields,
    ) -> Result<Option<Notification>, Error>;

    async fn delete_notification(&self, notification_id: NotificationId) -> Result<bool, Error>;

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<Option<Notification>, Error>;

    /// Marks every unread notification visible to the user as read and
    /// returns the ones that changed.
    async fn mark_all_notifications_read(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, Error>;
}

#[async_trait]
impl NotificationStore for SqliteNotificationStore {
    #[tracing::instrument(skip(self))]
    async fn insert_notification(
        &self,
        fields: &NotificationFields,
    ) -> Result<Notification, Error> {
        let now = Utc::now();
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, title, message, kind, target_audience, scheduled_for, expires_at,
                                        is_active, is_read, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
             RETURNING *",
        )
        .bind(&fields.user_id)
        .bind(&fields.title)
        .bind(&fields.message)
        .bind(fields.kind)
        .bind(fields.target_audience)
        .bind(fields.scheduled_for)
        .bind(fields.expires_at)
        .bind(fields.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(notification)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(notifications)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_notifications_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE user_id = ? OR target_audience = 'all'
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(notifications)
    }

    #[tracing::instrument(skip(self))]
    async fn update_notification(
        &self,
        notification_id: NotificationId,
        fields: &NotificationFields,
    ) -> Result<Option<Notification>, Error> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications
             SET user_id = ?, title = ?, message = ?, kind = ?, target_audience = ?, scheduled_for = ?,
                 expires_at = ?, is_active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&fields.user_id)
        .bind(&fields.title)
        .bind(&fields.message)
        .bind(fields.kind)
        .bind(fields.target_audience)
        .bind(fields.scheduled_for)
        .bind(fields.expires_at)
        .bind(fields.is_active)
        .bind(Utc::now())
        .bind(notification_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(notification)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_notification(&self, notification_id: NotificationId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(notification_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<Option<Notification>, Error> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = 1, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(Utc::now())
        .bind(notification_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(notification)
    }

    #[tracing::instrument(skip(self))]
    async fn mark_all_notifications_read(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            "UPDATE notifications
             SET is_read = 1, updated_at = ?
             WHERE (user_id = ? OR target_audience = 'all') AND is_read = 0
             RETURNING *",
        )
        .bind(Utc::now())
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(notifications)
    }
}
