//! Eligibility gate: a read-side derivation, recomputed from scratch on
//! every query and never persisted.

use serde::Serialize;
use sqlx::PgPool;
use time::{Date, PrimitiveDateTime};
use tracing::warn;
use uuid::Uuid;

use crate::config;
use crate::db::models::{NewNotification, NotificationKind};
use crate::db::repositories::{AttendanceRepository, ClassRepository, EnrollmentRepository};
use crate::error::{AppError, AppResult};
use crate::modules::notifications;
use crate::scheduling::calendar::SessionPlan;
use crate::scheduling::now_naive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassPhase {
    NotStarted,
    InProgress,
    Ended,
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityState {
    pub class_ended: bool,
    pub sessions_total: i64,
    pub sessions_present: i64,
    pub ratio: f64,
    pub eligible_for_evaluation: bool,
}

impl EligibilityState {
    fn empty(sessions_present: i64) -> Self {
        Self {
            class_ended: false,
            sessions_total: 0,
            sessions_present,
            ratio: 0.0,
            eligible_for_evaluation: false,
        }
    }
}

/// Phase of the class relative to `now`, from the plan's earliest start
/// and latest end. Ended means the end bound is strictly in the past.
pub fn phase_at(plan: &SessionPlan, now: PrimitiveDateTime) -> ClassPhase {
    match plan.bounds() {
        Some((start, end)) => {
            if now < start {
                ClassPhase::NotStarted
            } else if now <= end {
                ClassPhase::InProgress
            } else {
                ClassPhase::Ended
            }
        }
        None => ClassPhase::NotStarted,
    }
}

/// Pure eligibility computation: eligible iff the class has ended and
/// the distinct-present ratio reaches the threshold. Only dates the
/// plan actually holds a session on count toward the numerator.
pub fn compute_state(
    plan: &SessionPlan,
    present_dates: &[Date],
    now: PrimitiveDateTime,
    threshold: f64,
) -> EligibilityState {
    let sessions_total = plan.total_sessions() as i64;
    let sessions_present = present_dates
        .iter()
        .filter(|d| plan.has_session_on(**d))
        .count() as i64;
    let class_ended = phase_at(plan, now) == ClassPhase::Ended;
    let ratio = if sessions_total > 0 {
        sessions_present as f64 / sessions_total as f64
    } else {
        0.0
    };
    EligibilityState {
        class_ended,
        sessions_total,
        sessions_present,
        ratio,
        eligible_for_evaluation: class_ended && sessions_total > 0 && ratio >= threshold,
    }
}

/// Authoritative on-demand evaluation for one (participant, class) pair.
pub async fn evaluate(
    pool: &PgPool,
    participant_id: Uuid,
    class_id: Uuid,
) -> AppResult<EligibilityState> {
    let class = ClassRepository::get_class(pool, class_id)
        .await?
        .ok_or_else(|| AppError::NotFound("class does not exist".into()))?;
    if !EnrollmentRepository::exists(pool, participant_id, class_id).await? {
        return Err(AppError::NotFound(
            "participant is not enrolled in this class".into(),
        ));
    }

    let present = AttendanceRepository::present_dates(pool, participant_id, class_id).await?;

    match ClassRepository::session_plan(pool, &class).await? {
        Some(plan) => Ok(compute_state(
            &plan,
            &present,
            now_naive(),
            config::policy().attendance_ratio,
        )),
        // No calendar information at all: nothing to gate on.
        None => Ok(EligibilityState::empty(present.len() as i64)),
    }
}

/// Best-effort re-check after an attendance write. Emits the
/// "evaluation available" notification once the gate opens; the
/// notifier de-duplicates repeated triggers.
pub async fn refresh_after_attendance(pool: &PgPool, participant_id: Uuid, class_id: Uuid) {
    match evaluate(pool, participant_id, class_id).await {
        Ok(state) if state.eligible_for_evaluation => {
            notifications::service::notify_if_absent(
                pool,
                NewNotification {
                    user_id: participant_id,
                    kind: NotificationKind::EvaluationAvailable,
                    title: "Evaluation available".into(),
                    message: "You reached the attendance threshold; the course evaluation is now available.".into(),
                    class_id: Some(class_id),
                    event_id: None,
                    expires_at: None,
                },
            )
            .await;
        }
        Ok(_) => {}
        Err(err) => {
            warn!(
                error = %err,
                participant_id = %participant_id,
                class_id = %class_id,
                "Eligibility re-check after attendance write failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::calendar::SessionSlot;
    use time::macros::{date, datetime, time};

    fn four_morning_sessions() -> SessionPlan {
        SessionPlan::Explicit(
            [
                date!(2024 - 03 - 01),
                date!(2024 - 03 - 02),
                date!(2024 - 03 - 03),
                date!(2024 - 03 - 04),
            ]
            .into_iter()
            .map(|d| SessionSlot {
                date: d,
                start_time: time!(08:00),
                end_time: time!(12:00),
            })
            .collect(),
        )
    }

    #[test]
    fn phase_follows_session_bounds() {
        let plan = four_morning_sessions();
        assert_eq!(
            phase_at(&plan, datetime!(2024 - 02 - 28 12:00)),
            ClassPhase::NotStarted
        );
        assert_eq!(
            phase_at(&plan, datetime!(2024 - 03 - 02 10:00)),
            ClassPhase::InProgress
        );
        // Exactly at the final end bound the class has not yet ended.
        assert_eq!(
            phase_at(&plan, datetime!(2024 - 03 - 04 12:00)),
            ClassPhase::InProgress
        );
        assert_eq!(
            phase_at(&plan, datetime!(2024 - 03 - 04 12:01)),
            ClassPhase::Ended
        );
    }

    #[test]
    fn three_of_four_sessions_reaches_threshold_once_ended() {
        let plan = four_morning_sessions();
        let present = [
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 02),
            date!(2024 - 03 - 03),
        ];

        let during = compute_state(&plan, &present, datetime!(2024 - 03 - 03 09:00), 0.75);
        assert!(!during.class_ended);
        assert!(!during.eligible_for_evaluation);

        let after = compute_state(&plan, &present, datetime!(2024 - 03 - 05 00:00), 0.75);
        assert!(after.class_ended);
        assert_eq!(after.ratio, 0.75);
        assert!(after.eligible_for_evaluation);
    }

    #[test]
    fn two_of_four_sessions_is_not_enough() {
        let plan = four_morning_sessions();
        let present = [date!(2024 - 03 - 01), date!(2024 - 03 - 02)];
        let state = compute_state(&plan, &present, datetime!(2024 - 03 - 05 00:00), 0.75);
        assert!(state.class_ended);
        assert!(!state.eligible_for_evaluation);
    }

    #[test]
    fn marks_on_dates_without_a_session_do_not_count() {
        let plan = four_morning_sessions();
        // Two real session dates plus two marks the calendar never held a
        // session on. Only the real ones reach the numerator.
        let present = [
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 02),
            date!(2024 - 03 - 10),
            date!(2099 - 01 - 01),
        ];
        let state = compute_state(&plan, &present, datetime!(2024 - 03 - 05 00:00), 0.75);
        assert!(state.class_ended);
        assert_eq!(state.sessions_present, 2);
        assert_eq!(state.ratio, 0.5);
        assert!(!state.eligible_for_evaluation);
    }

    #[test]
    fn additional_present_date_never_decreases_ratio() {
        let plan = four_morning_sessions();
        let dates = [
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 02),
            date!(2024 - 03 - 03),
            date!(2024 - 03 - 04),
        ];
        let now = datetime!(2024 - 03 - 05 00:00);
        let mut previous = 0.0;
        for n in 0..=dates.len() {
            let state = compute_state(&plan, &dates[..n], now, 0.75);
            assert!(state.ratio >= previous);
            previous = state.ratio;
        }
    }

    #[test]
    fn empty_plan_is_never_eligible() {
        let plan = SessionPlan::Explicit(vec![]);
        let present = [date!(2024 - 03 - 01), date!(2024 - 03 - 02)];
        let state = compute_state(&plan, &present, datetime!(2024 - 03 - 05 00:00), 0.75);
        assert_eq!(state.sessions_total, 0);
        assert_eq!(state.sessions_present, 0);
        assert!(!state.eligible_for_evaluation);
    }
}
