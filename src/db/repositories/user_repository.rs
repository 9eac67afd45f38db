use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::User;
use crate::db::DatabaseError;

pub struct UserRepository;

impl UserRepository {
    pub async fn get_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: Uuid,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, organizational_unit, external_id, created_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(user)
    }

    /// Whether the external identifier is on the event's allow-list.
    pub async fn is_external_allowed<'e>(
        executor: impl PgExecutor<'e>,
        event_id: Uuid,
        external_id: &str,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_allowed_externals \
             WHERE event_id = $1 AND external_id = $2)",
        )
        .bind(event_id)
        .bind(external_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }
}
