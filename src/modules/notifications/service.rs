//! Idempotent, best-effort notification emission. Failures here are
//! logged and swallowed: notification delivery must never fail the
//! operation that triggered it.

use sqlx::PgPool;
use tracing::{debug, warn};

use crate::db::models::NewNotification;
use crate::db::repositories::NotificationRepository;

/// Inserts the notification unless an unread one with the same
/// (user, kind, class|event) key already exists.
pub async fn notify_if_absent(pool: &PgPool, notification: NewNotification) {
    match NotificationRepository::exists_unread(
        pool,
        notification.user_id,
        notification.kind,
        notification.class_id,
        notification.event_id,
    )
    .await
    {
        Ok(true) => {
            debug!(
                user_id = %notification.user_id,
                kind = ?notification.kind,
                "Notification already pending, skipping"
            );
            return;
        }
        Ok(false) => {}
        Err(err) => {
            warn!(error = %err, "Notification de-duplication check failed");
            return;
        }
    }

    if let Err(err) = NotificationRepository::insert(pool, &notification).await {
        warn!(
            error = %err,
            user_id = %notification.user_id,
            kind = ?notification.kind,
            "Failed to persist notification"
        );
    }
}
