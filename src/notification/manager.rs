use crate::database::Database;
use crate::error::Error;
use crate::user::UserId;

use super::{Notification, NotificationFields, NotificationId, TargetAudience};

fn check_fields(fields: &NotificationFields) -> Result<(), Error> {
    if fields.target_audience == TargetAudience::User && fields.user_id.is_none() {
        return Err(Error::MissingField { field: "user_id" });
    }

    if fields.expires_at < fields.scheduled_for {
        return Err(Error::InvalidField {
            field: "expires_at",
            reason: "must not be before scheduled_for",
        });
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn create_notification(
    db: &dyn Database,
    fields: NotificationFields,
) -> Result<Notification, Error> {
    check_fields(&fields)?;

    let notification = db.notifications().insert_notification(&fields).await?;

    Ok(notification)
}

#[tracing::instrument(skip(db))]
pub async fn get_notifications(db: &dyn Database) -> Result<Vec<Notification>, Error> {
    let notifications = db.notifications().fetch_notifications().await?;

    Ok(notifications)
}

#[tracing::instrument(skip(db))]
pub async fn get_notifications_for_user(
    db: &dyn Database,
    user_id: &UserId,
) -> Result<Vec<Notification>, Error> {
    let notifications = db
        .notifications()
        .fetch_notifications_for_user(user_id)
        .await?;

    Ok(notifications)
}

#[tracing::instrument(skip(db))]
pub async fn update_notification(
    db: &dyn Database,
    notification_id: NotificationId,
    fields: NotificationFields,
) -> Result<Notification, Error> {
    check_fields(&fields)?;

    let notification = db
        .notifications()
        .update_notification(notification_id, &fields)
        .await?
        .ok_or(Error::NotificationNotFound { notification_id })?;

    Ok(notification)
}

#[tracing::instrument(skip(db))]
pub async fn delete_notification(
    db: &dyn Database,
    notification_id: NotificationId,
) -> Result<(), Error> {
    if !db.notifications().delete_notification(notification_id).await? {
        return Err(Error::NotificationNotFound { notification_id });
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn mark_read(
    db: &dyn Database,
    notification_id: NotificationId,
) -> Result<Notification, Error> {
    let notification = db
        .notifications()
        .mark_notification_read(notification_id)
        .await?
        .ok_or(Error::NotificationNotFound { notification_id })?;

    Ok(notification)
}

#[tracing::instrument(skip(db))]
pub async fn mark_all_read(
    db: &dyn Database,
    user_id: &UserId,
) -> Result<Vec<Notification>, Error> {
    let notifications = db
        .notifications()
        .mark_all_notifications_read(user_id)
        .await?;

    Ok(notifications)
}
