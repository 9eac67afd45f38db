//! Enrollment engine: eligibility validation and atomic commit of new
//! enrollments, plus cancellation.
//!
//! `enroll` runs as one transaction with the class row locked for
//! update, so two concurrent attempts for the same class either
//! serialize on the lock or one aborts on the post-lock capacity
//! recount. Returning an error drops the transaction, which rolls it
//! back.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::db::models::{Enrollment, NewNotification, NotificationKind};
use crate::db::repositories::{
    AttendanceRepository, ClassRepository, EnrollmentRepository, UserRepository,
};
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};
use crate::modules::{access, notifications};
use crate::scheduling::calendar::{plans_conflict, SessionPlan};

pub async fn enroll(pool: &PgPool, participant_id: Uuid, class_id: Uuid) -> AppResult<Enrollment> {
    let mut tx = pool.begin().await.map_err(DatabaseError::from)?;

    let class = ClassRepository::lock_class(&mut tx, class_id)
        .await?
        .ok_or_else(|| AppError::NotFound("class does not exist".into()))?;
    let event = ClassRepository::get_event(&mut *tx, class.event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("event does not exist".into()))?;
    let participant = UserRepository::get_user(&mut *tx, participant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("participant does not exist".into()))?;

    if event.restricted {
        let decision = access::can_access(&mut tx, &participant, &event).await?;
        if !decision.ok {
            return Err(AppError::Forbidden(
                decision
                    .reason
                    .unwrap_or_else(|| "event access is restricted".into()),
            ));
        }
    }

    if ClassRepository::is_event_instructor(&mut *tx, event.id, participant_id).await? {
        return Err(AppError::Forbidden(
            "event instructors cannot enroll as participants".into(),
        ));
    }

    if EnrollmentRepository::exists(&mut *tx, participant_id, class_id).await? {
        return Err(AppError::Conflict(
            "participant is already enrolled in this class".into(),
        ));
    }

    let other_classes =
        EnrollmentRepository::other_enrolled_classes(&mut *tx, participant_id, class_id).await?;

    if !event.allows_multiple_tracks()
        && other_classes.iter().any(|c| c.event_id == event.id)
    {
        return Err(AppError::Conflict(
            "participant already holds a class in this event".into(),
        ));
    }

    // Time-conflict check against every other enrollment, same event or
    // not. Session-by-session when the candidate has explicit sessions;
    // its whole date range as one interval otherwise.
    let candidate_sessions = ClassRepository::sessions_of(&mut *tx, class_id).await?;
    if let Some(candidate_plan) = SessionPlan::for_class(&class, candidate_sessions) {
        for other in &other_classes {
            let other_sessions = ClassRepository::sessions_of(&mut *tx, other.id).await?;
            if let Some(other_plan) = SessionPlan::for_class(other, other_sessions) {
                if plans_conflict(&candidate_plan, &other_plan) {
                    return Err(AppError::Conflict(format!(
                        "schedule conflicts with enrolled class \"{}\"",
                        other.name
                    )));
                }
            }
        }
    }

    let enrolled = EnrollmentRepository::count_for_class(&mut *tx, class_id).await?;
    if enrolled >= i64::from(class.capacity) {
        return Err(AppError::Conflict("class is at capacity".into()));
    }

    // Constraint violations here are races the checks above missed under
    // concurrent load; they surface with the same conflict vocabulary.
    let enrollment = EnrollmentRepository::insert(&mut tx, participant_id, class_id)
        .await
        .map_err(|err| match err {
            DatabaseError::Duplicate => {
                AppError::Conflict("participant is already enrolled in this class".into())
            }
            other => AppError::from(other),
        })?;

    tx.commit().await.map_err(DatabaseError::from)?;

    // Best-effort side effects after the commit; a flaky collaborator
    // can never roll back a committed enrollment.
    let pool = pool.clone();
    let class_name = class.name.clone();
    tokio::spawn(async move {
        notifications::service::notify_if_absent(
            &pool,
            NewNotification {
                user_id: participant_id,
                kind: NotificationKind::EnrollmentConfirmed,
                title: "Enrollment confirmed".into(),
                message: format!("Your enrollment in \"{class_name}\" is confirmed."),
                class_id: Some(class_id),
                event_id: Some(event.id),
                expires_at: None,
            },
        )
        .await;

        if let Err(err) = notifications::mailer::send_enrollment_confirmation(
            &participant.email,
            &participant.name,
            &class_name,
        )
        .await
        {
            warn!(error = %err, "Enrollment confirmation email failed");
        }
    });

    Ok(enrollment)
}

pub async fn cancel(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
    acting_user_id: Uuid,
) -> AppResult<()> {
    let mut tx = pool.begin().await.map_err(DatabaseError::from)?;

    if !EnrollmentRepository::exists(&mut *tx, participant_id, class_id).await? {
        return Err(AppError::NotFound("enrollment does not exist".into()));
    }

    if acting_user_id != participant_id {
        let actor = UserRepository::get_user(&mut *tx, acting_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("acting user does not exist".into()))?;
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "only the participant or an administrator may cancel an enrollment".into(),
            ));
        }
    }

    // Cancellation cascades to the participant's attendance for the class.
    AttendanceRepository::delete_for_participant(&mut tx, participant_id, class_id).await?;
    EnrollmentRepository::delete(&mut tx, participant_id, class_id).await?;

    tx.commit().await.map_err(DatabaseError::from)?;
    Ok(())
}

pub async fn roster(pool: &PgPool, class_id: Uuid) -> AppResult<Vec<Enrollment>> {
    ClassRepository::get_class(pool, class_id)
        .await?
        .ok_or_else(|| AppError::NotFound("class does not exist".into()))?;
    Ok(EnrollmentRepository::list_for_class(pool, class_id).await?)
}
