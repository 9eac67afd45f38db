use sqlx::{PgExecutor, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use crate::db::models::Attendance;
use crate::db::DatabaseError;

pub struct AttendanceRepository;

impl AttendanceRepository {
    /// Upsert keyed on (participant, class, session date). `present`
    /// always takes the new value; `confirmed_at` is refreshed only when
    /// the new mark is present.
    pub async fn upsert_mark(
        tx: &mut Transaction<'_, Postgres>,
        participant_id: Uuid,
        class_id: Uuid,
        session_date: Date,
        present: bool,
    ) -> Result<Attendance, DatabaseError> {
        let attendance = sqlx::query_as::<_, Attendance>(
            "INSERT INTO attendance (participant_id, class_id, session_date, present, confirmed_at) \
             VALUES ($1, $2, $3, $4, CASE WHEN $4 THEN NOW() END) \
             ON CONFLICT (participant_id, class_id, session_date) \
             DO UPDATE SET present = EXCLUDED.present, \
                           confirmed_at = CASE WHEN EXCLUDED.present THEN NOW() \
                                               ELSE attendance.confirmed_at END \
             RETURNING id, participant_id, class_id, session_date, present, confirmed_at",
        )
        .bind(participant_id)
        .bind(class_id)
        .bind(session_date)
        .bind(present)
        .fetch_one(&mut **tx)
        .await?;
        Ok(attendance)
    }

    /// Distinct dates marked present; multiple marks on the same date
    /// count once. Callers decide which of these dates are actual
    /// session dates.
    pub async fn present_dates<'e>(
        executor: impl PgExecutor<'e>,
        participant_id: Uuid,
        class_id: Uuid,
    ) -> Result<Vec<Date>, DatabaseError> {
        let dates = sqlx::query_scalar::<_, Date>(
            "SELECT DISTINCT session_date FROM attendance \
             WHERE participant_id = $1 AND class_id = $2 AND present",
        )
        .bind(participant_id)
        .bind(class_id)
        .fetch_all(executor)
        .await?;
        Ok(dates)
    }

    pub async fn list_for_participant<'e>(
        executor: impl PgExecutor<'e>,
        participant_id: Uuid,
        class_id: Uuid,
    ) -> Result<Vec<Attendance>, DatabaseError> {
        let rows = sqlx::query_as::<_, Attendance>(
            "SELECT id, participant_id, class_id, session_date, present, confirmed_at \
             FROM attendance WHERE participant_id = $1 AND class_id = $2 \
             ORDER BY session_date",
        )
        .bind(participant_id)
        .bind(class_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Removes every attendance row the participant holds for the class.
    /// Runs inside the cancellation transaction.
    pub async fn delete_for_participant(
        tx: &mut Transaction<'_, Postgres>,
        participant_id: Uuid,
        class_id: Uuid,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM attendance WHERE participant_id = $1 AND class_id = $2",
        )
        .bind(participant_id)
        .bind(class_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
