//! Attendance tracker: present/absent upserts under time-windowed
//! confirmation rules. Every successful write re-evaluates evaluation
//! eligibility for the pair, best-effort.

use sqlx::PgPool;
use time::{Date, Duration, PrimitiveDateTime};
use uuid::Uuid;

use crate::config;
use crate::db::models::{Attendance, Class};
use crate::db::repositories::{
    AttendanceRepository, ClassRepository, EnrollmentRepository, UserRepository,
};
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};
use crate::modules::eligibility;
use crate::scheduling::calendar::SessionPlan;
use crate::scheduling::now_naive;

/// Self-service confirmation opens shortly before the session starts and
/// has no upper bound within the day.
pub fn self_confirm_open(
    session_start: PrimitiveDateTime,
    now: PrimitiveDateTime,
    early_margin: Duration,
) -> bool {
    now >= session_start - early_margin
}

/// Instructors may confirm until the window after session end closes.
pub fn instructor_window_open(
    session_end: PrimitiveDateTime,
    now: PrimitiveDateTime,
    window: Duration,
) -> bool {
    now <= session_end + window
}

/// Administrative backfill reaches at most `max_days` whole days back
/// and never into the future.
pub fn backfill_within_window(session_date: Date, today: Date, max_days: i64) -> bool {
    let age = (today - session_date).whole_days();
    (0..=max_days).contains(&age)
}

/// Present mark for administrative/instructor surfaces. The date must
/// be one of the class's session dates.
pub async fn mark_present(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
    session_date: Date,
) -> AppResult<Attendance> {
    checked_mark(pool, participant_id, class_id, session_date, true).await
}

/// Explicit `present = false` placeholder, distinct from "no row yet",
/// so reports can tell "not yet evaluated" from "confirmed absent".
pub async fn mark_pending(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
    session_date: Date,
) -> AppResult<Attendance> {
    checked_mark(pool, participant_id, class_id, session_date, false).await
}

/// Self-service confirmation for today's session. Requires an active
/// enrollment, a session scheduled today, and the current time to be no
/// earlier than the configured margin before session start.
pub async fn self_confirm(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
) -> AppResult<Attendance> {
    let now = now_naive();
    let class = require_class(pool, class_id).await?;
    require_enrollment(pool, participant_id, class_id).await?;

    let today = now.date();
    let plan = require_session_on(pool, &class, today).await?;

    let session_start = PrimitiveDateTime::new(today, plan.start_time_on(today));
    let margin = Duration::minutes(config::policy().self_confirm_early_minutes);
    if !self_confirm_open(session_start, now, margin) {
        return Err(AppError::Conflict(
            "confirmation window is not yet open".into(),
        ));
    }

    write_mark(pool, participant_id, class_id, today, true).await
}

/// Instructor confirmation for a dated session, allowed until the
/// configured window after that session's end time has passed.
pub async fn instructor_confirm(
    pool: &PgPool,
    instructor_id: Uuid,
    participant_id: Uuid,
    class_id: Uuid,
    session_date: Date,
) -> AppResult<Attendance> {
    let now = now_naive();
    let class = require_class(pool, class_id).await?;

    if !ClassRepository::is_event_instructor(pool, class.event_id, instructor_id).await? {
        return Err(AppError::Forbidden(
            "only an instructor of the event may confirm attendance".into(),
        ));
    }
    require_enrollment(pool, participant_id, class_id).await?;

    let plan = require_session_on(pool, &class, session_date).await?;
    let session_end = PrimitiveDateTime::new(session_date, plan.end_time_on(session_date));
    let window = Duration::hours(config::policy().instructor_confirm_hours);
    if !instructor_window_open(session_end, now, window) {
        return Err(AppError::Conflict("confirmation window has expired".into()));
    }

    write_mark(pool, participant_id, class_id, session_date, true).await
}

/// Relaxed administrative correction path, reaching a configured number
/// of days into the past.
pub async fn administrative_backfill(
    pool: &PgPool,
    acting_user_id: Uuid,
    participant_id: Uuid,
    class_id: Uuid,
    session_date: Date,
    present: bool,
) -> AppResult<Attendance> {
    let actor = UserRepository::get_user(pool, acting_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("acting user does not exist".into()))?;
    if !actor.is_admin() {
        return Err(AppError::Forbidden(
            "backfill requires administrative rights".into(),
        ));
    }

    let class = require_class(pool, class_id).await?;
    require_enrollment(pool, participant_id, class_id).await?;

    let today = now_naive().date();
    let max_days = config::policy().backfill_max_days;
    if !backfill_within_window(session_date, today, max_days) {
        return Err(AppError::Conflict(format!(
            "backfill window of {max_days} days has expired"
        )));
    }
    require_session_on(pool, &class, session_date).await?;

    write_mark(pool, participant_id, class_id, session_date, present).await
}

/// Per-session marks for one participant, in date order. Rows missing
/// entirely mean "not yet evaluated"; `present = false` rows are
/// confirmed absences or pending placeholders.
pub async fn participant_report(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
) -> AppResult<Vec<Attendance>> {
    require_class(pool, class_id).await?;
    require_enrollment(pool, participant_id, class_id).await?;
    Ok(AttendanceRepository::list_for_participant(pool, participant_id, class_id).await?)
}

async fn checked_mark(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
    session_date: Date,
    present: bool,
) -> AppResult<Attendance> {
    let class = require_class(pool, class_id).await?;
    require_enrollment(pool, participant_id, class_id).await?;
    require_session_on(pool, &class, session_date).await?;
    write_mark(pool, participant_id, class_id, session_date, present).await
}

async fn require_class(pool: &PgPool, class_id: Uuid) -> AppResult<Class> {
    ClassRepository::get_class(pool, class_id)
        .await?
        .ok_or_else(|| AppError::NotFound("class does not exist".into()))
}

/// The class must have a calendar holding a session on the given date.
/// Marks on off-calendar dates would otherwise distort the eligibility
/// numerator.
async fn require_session_on(
    pool: &PgPool,
    class: &Class,
    date: Date,
) -> AppResult<SessionPlan> {
    let plan = ClassRepository::session_plan(pool, class)
        .await?
        .ok_or_else(|| AppError::Conflict("class has no scheduled sessions".into()))?;
    if !plan.has_session_on(date) {
        return Err(AppError::Conflict(
            "no session is scheduled on this date".into(),
        ));
    }
    Ok(plan)
}

async fn require_enrollment(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
) -> AppResult<()> {
    if EnrollmentRepository::exists(pool, participant_id, class_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(
            "participant is not enrolled in this class".into(),
        ))
    }
}

/// Transactional upsert plus a fire-and-forget eligibility re-check.
async fn write_mark(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
    session_date: Date,
    present: bool,
) -> AppResult<Attendance> {
    let mut tx = pool.begin().await.map_err(DatabaseError::from)?;
    let attendance =
        AttendanceRepository::upsert_mark(&mut tx, participant_id, class_id, session_date, present)
            .await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    let pool = pool.clone();
    tokio::spawn(async move {
        eligibility::service::refresh_after_attendance(&pool, participant_id, class_id).await;
    });

    Ok(attendance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn self_confirm_opens_thirty_minutes_before_start() {
        let start = datetime!(2024 - 03 - 01 08:00);
        let margin = Duration::minutes(30);

        // 45 minutes early: not yet open.
        assert!(!self_confirm_open(start, datetime!(2024 - 03 - 01 07:15), margin));
        // 15 minutes early: open.
        assert!(self_confirm_open(start, datetime!(2024 - 03 - 01 07:45), margin));
        // Exactly at the margin boundary: open.
        assert!(self_confirm_open(start, datetime!(2024 - 03 - 01 07:30), margin));
        // Hours late the same day: still open, no upper bound.
        assert!(self_confirm_open(start, datetime!(2024 - 03 - 01 22:00), margin));
    }

    #[test]
    fn instructor_window_closes_after_forty_eight_hours() {
        let end = datetime!(2024 - 03 - 01 12:00);
        let window = Duration::hours(48);

        assert!(instructor_window_open(end, datetime!(2024 - 03 - 01 13:00), window));
        assert!(instructor_window_open(end, datetime!(2024 - 03 - 03 12:00), window));
        assert!(!instructor_window_open(end, datetime!(2024 - 03 - 03 12:01), window));
    }

    #[test]
    fn backfill_window_counts_whole_days() {
        let today = date!(2024 - 06 - 30);
        assert!(backfill_within_window(date!(2024 - 06 - 30), today, 60));
        assert!(backfill_within_window(date!(2024 - 05 - 01), today, 60));
        assert!(!backfill_within_window(date!(2024 - 04 - 01), today, 60));
    }

    #[test]
    fn backfill_rejects_future_dates() {
        let today = date!(2024 - 06 - 30);
        assert!(!backfill_within_window(date!(2024 - 07 - 01), today, 60));
        assert!(!backfill_within_window(date!(2024 - 07 - 15), today, 60));
    }
}
