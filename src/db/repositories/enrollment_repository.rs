use sqlx::{PgExecutor, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{Class, Enrollment};
use crate::db::DatabaseError;

const ENROLLMENT_COLUMNS: &str = "id, class_id, participant_id, created_at";

pub struct EnrollmentRepository;

impl EnrollmentRepository {
    /// Inserts the enrollment row. The unique constraint on
    /// (participant_id, class_id) is the second line of defense against
    /// duplicate races; its violation maps to `DatabaseError::Duplicate`.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        participant_id: Uuid,
        class_id: Uuid,
    ) -> Result<Enrollment, DatabaseError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "INSERT INTO enrollments (class_id, participant_id) VALUES ($1, $2) \
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(class_id)
        .bind(participant_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(enrollment)
    }

    pub async fn exists<'e>(
        executor: impl PgExecutor<'e>,
        participant_id: Uuid,
        class_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE participant_id = $1 AND class_id = $2)",
        )
        .bind(participant_id)
        .bind(class_id)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn count_for_class<'e>(
        executor: impl PgExecutor<'e>,
        class_id: Uuid,
    ) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE class_id = $1",
        )
        .bind(class_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    /// All classes the participant is enrolled in, except the given one.
    /// Used for the one-track-per-event rule and the global time-conflict
    /// check.
    pub async fn other_enrolled_classes<'e>(
        executor: impl PgExecutor<'e>,
        participant_id: Uuid,
        exclude_class_id: Uuid,
    ) -> Result<Vec<Class>, DatabaseError> {
        let classes = sqlx::query_as::<_, Class>(
            "SELECT c.id, c.event_id, c.name, c.capacity, c.start_date, c.end_date, \
                    c.start_time, c.end_time, c.signing_instructor, c.created_at \
             FROM classes c \
             JOIN enrollments e ON e.class_id = c.id \
             WHERE e.participant_id = $1 AND c.id <> $2",
        )
        .bind(participant_id)
        .bind(exclude_class_id)
        .fetch_all(executor)
        .await?;
        Ok(classes)
    }

    pub async fn list_for_class<'e>(
        executor: impl PgExecutor<'e>,
        class_id: Uuid,
    ) -> Result<Vec<Enrollment>, DatabaseError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments \
             WHERE class_id = $1 ORDER BY created_at"
        ))
        .bind(class_id)
        .fetch_all(executor)
        .await?;
        Ok(enrollments)
    }

    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        participant_id: Uuid,
        class_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM enrollments WHERE participant_id = $1 AND class_id = $2",
        )
        .bind(participant_id)
        .bind(class_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
