use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::{NewNotification, Notification, NotificationKind};
use crate::db::DatabaseError;

pub struct NotificationRepository;

impl NotificationRepository {
    /// Existence check behind the notification de-duplication: scoped by
    /// participant + kind plus whichever of class/event is known.
    pub async fn exists_unread<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
        kind: NotificationKind,
        class_id: Option<Uuid>,
        event_id: Option<Uuid>,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM notifications \
             WHERE user_id = $1 AND kind = $2 AND NOT is_read \
               AND ($3::uuid IS NULL OR class_id = $3) \
               AND ($4::uuid IS NULL OR event_id = $4))",
        )
        .bind(user_id)
        .bind(kind)
        .bind(class_id)
        .bind(event_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        notification: &NewNotification,
    ) -> Result<Notification, DatabaseError> {
        let row = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, kind, title, message, class_id, event_id, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, kind, title, message, is_read, class_id, event_id, \
                       created_at, read_at, expires_at",
        )
        .bind(notification.user_id)
        .bind(notification.kind)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.class_id)
        .bind(notification.event_id)
        .bind(notification.expires_at)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }
}
