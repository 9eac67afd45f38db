use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{Class, ClassSession, Event};
use crate::db::DatabaseError;
use crate::scheduling::calendar::SessionPlan;

const CLASS_COLUMNS: &str = "id, event_id, name, capacity, start_date, end_date, \
                             start_time, end_time, signing_instructor, created_at";

pub struct ClassRepository;

impl ClassRepository {
    pub async fn get_class<'e>(
        executor: impl PgExecutor<'e>,
        class_id: Uuid,
    ) -> Result<Option<Class>, DatabaseError> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"
        ))
        .bind(class_id)
        .fetch_optional(executor)
        .await?;
        Ok(class)
    }

    /// Fetches the class row with a row-level lock, serializing concurrent
    /// enrollment attempts for the same class so the capacity recount is
    /// race-safe.
    pub async fn lock_class(
        tx: &mut Transaction<'_, Postgres>,
        class_id: Uuid,
    ) -> Result<Option<Class>, DatabaseError> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1 FOR UPDATE"
        ))
        .bind(class_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(class)
    }

    pub async fn get_event<'e>(
        executor: impl PgExecutor<'e>,
        event_id: Uuid,
    ) -> Result<Option<Event>, DatabaseError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, kind, restricted, restriction_mode, allowed_role, \
                    allowed_unit, created_at \
             FROM events WHERE id = $1",
        )
        .bind(event_id)
        .fetch_optional(executor)
        .await?;
        Ok(event)
    }

    pub async fn sessions_of<'e>(
        executor: impl PgExecutor<'e>,
        class_id: Uuid,
    ) -> Result<Vec<ClassSession>, DatabaseError> {
        let sessions = sqlx::query_as::<_, ClassSession>(
            "SELECT id, class_id, session_date, start_time, end_time \
             FROM class_sessions WHERE class_id = $1 ORDER BY session_date",
        )
        .bind(class_id)
        .fetch_all(executor)
        .await?;
        Ok(sessions)
    }

    /// Resolved calendar for a class: explicit session rows, or the
    /// class's own range as fallback. `None` when neither is known.
    pub async fn session_plan(
        pool: &PgPool,
        class: &Class,
    ) -> Result<Option<SessionPlan>, DatabaseError> {
        let sessions = Self::sessions_of(pool, class.id).await?;
        Ok(SessionPlan::for_class(class, sessions))
    }

    pub async fn is_event_instructor<'e>(
        executor: impl PgExecutor<'e>,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_instructors WHERE event_id = $1 AND user_id = $2)",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }
}
