use time::macros::time;
use time::{Date, PrimitiveDateTime, Time};

use crate::db::models::{Class, ClassSession};
use crate::scheduling::overlap::{intervals_conflict, DateTimeInterval};

/// Conservative "all day" bounds used when nothing is known about a
/// session's times, so confirmation-window checks never spuriously
/// reject a legitimate attempt.
pub const DEFAULT_SESSION_START: Time = time!(08:00);
pub const DEFAULT_SESSION_END: Time = time!(23:59);

/// Bounds used when synthesizing whole-day sessions from a bare date range.
const RANGE_DAY_START: Time = time!(00:00);
const RANGE_DAY_END: Time = time!(23:59);

/// One concrete resolved session occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSlot {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

/// How a class's calendar is known: either explicit session rows, or only
/// the class's own date range, treated as one implicit session per
/// calendar day. Modeled as a tagged union so resolution lives in one
/// place instead of scattered null checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPlan {
    Explicit(Vec<SessionSlot>),
    ImplicitRange {
        start_date: Date,
        end_date: Date,
        start_time: Option<Time>,
        end_time: Option<Time>,
    },
}

impl SessionPlan {
    /// Resolves a class's calendar. Explicit sessions win; otherwise the
    /// class's own date range yields an implicit plan. Returns `None`
    /// when neither is known.
    pub fn for_class(class: &Class, mut sessions: Vec<ClassSession>) -> Option<Self> {
        if !sessions.is_empty() {
            sessions.sort_by_key(|s| s.session_date);
            return Some(Self::Explicit(
                sessions
                    .into_iter()
                    .map(|s| SessionSlot {
                        date: s.session_date,
                        start_time: s.start_time,
                        end_time: s.end_time,
                    })
                    .collect(),
            ));
        }
        match (class.start_date, class.end_date) {
            (Some(start), Some(end)) if start <= end => Some(Self::ImplicitRange {
                start_date: start,
                end_date: end,
                start_time: class.start_time,
                end_time: class.end_time,
            }),
            _ => None,
        }
    }

    /// Concrete sessions in date order, one per calendar day for an
    /// implicit range.
    pub fn slots(&self) -> Vec<SessionSlot> {
        match self {
            Self::Explicit(slots) => slots.clone(),
            Self::ImplicitRange {
                start_date,
                end_date,
                start_time,
                end_time,
            } => {
                let from = start_time.unwrap_or(RANGE_DAY_START);
                let to = end_time.unwrap_or(RANGE_DAY_END);
                let mut slots = Vec::new();
                let mut day = *start_date;
                while day <= *end_date {
                    slots.push(SessionSlot {
                        date: day,
                        start_time: from,
                        end_time: to,
                    });
                    match day.next_day() {
                        Some(next) => day = next,
                        None => break,
                    }
                }
                slots
            }
        }
    }

    pub fn total_sessions(&self) -> usize {
        match self {
            Self::Explicit(slots) => slots.len(),
            Self::ImplicitRange { .. } => self.slots().len(),
        }
    }

    /// Intervals used for conflict checking. Explicit sessions are
    /// compared one by one; an implicit range is compared as a single
    /// whole-range interval.
    pub fn intervals(&self) -> Vec<DateTimeInterval> {
        match self {
            Self::Explicit(slots) => slots
                .iter()
                .map(|s| DateTimeInterval::single_day(s.date, s.start_time, s.end_time))
                .collect(),
            Self::ImplicitRange {
                start_date,
                end_date,
                start_time,
                end_time,
            } => vec![DateTimeInterval {
                start_date: *start_date,
                end_date: *end_date,
                start_time: start_time.unwrap_or(RANGE_DAY_START),
                end_time: end_time.unwrap_or(RANGE_DAY_END),
            }],
        }
    }

    pub fn slot_on(&self, date: Date) -> Option<SessionSlot> {
        self.slots().into_iter().find(|s| s.date == date)
    }

    /// Session start time on the given date, defaulting to 08:00 when
    /// nothing is known for that day.
    pub fn start_time_on(&self, date: Date) -> Time {
        match self {
            Self::Explicit(_) => self
                .slot_on(date)
                .map_or(DEFAULT_SESSION_START, |s| s.start_time),
            Self::ImplicitRange {
                start_date,
                end_date,
                start_time,
                ..
            } => {
                if *start_date <= date && date <= *end_date {
                    start_time.unwrap_or(DEFAULT_SESSION_START)
                } else {
                    DEFAULT_SESSION_START
                }
            }
        }
    }

    /// Session end time on the given date, defaulting to 23:59 when
    /// nothing is known for that day.
    pub fn end_time_on(&self, date: Date) -> Time {
        match self {
            Self::Explicit(_) => self
                .slot_on(date)
                .map_or(DEFAULT_SESSION_END, |s| s.end_time),
            Self::ImplicitRange {
                start_date,
                end_date,
                end_time,
                ..
            } => {
                if *start_date <= date && date <= *end_date {
                    end_time.unwrap_or(DEFAULT_SESSION_END)
                } else {
                    DEFAULT_SESSION_END
                }
            }
        }
    }

    pub fn has_session_on(&self, date: Date) -> bool {
        match self {
            Self::Explicit(slots) => slots.iter().any(|s| s.date == date),
            Self::ImplicitRange {
                start_date,
                end_date,
                ..
            } => *start_date <= date && date <= *end_date,
        }
    }

    /// Earliest start and latest end of the whole plan, as naive
    /// datetimes. `None` only for an empty explicit list.
    pub fn bounds(&self) -> Option<(PrimitiveDateTime, PrimitiveDateTime)> {
        let slots = self.slots();
        let first = slots.first()?;
        let last = slots.last()?;
        Some((
            PrimitiveDateTime::new(first.date, first.start_time),
            PrimitiveDateTime::new(last.date, last.end_time),
        ))
    }
}

/// Any-vs-any conflict between two plans.
pub fn plans_conflict(a: &SessionPlan, b: &SessionPlan) -> bool {
    let a_intervals = a.intervals();
    let b_intervals = b.intervals();
    a_intervals
        .iter()
        .any(|ia| b_intervals.iter().any(|ib| intervals_conflict(ia, ib)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn class_with_range(
        start_date: Option<Date>,
        end_date: Option<Date>,
        start_time: Option<Time>,
        end_time: Option<Time>,
    ) -> Class {
        Class {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "test".into(),
            capacity: 10,
            start_date,
            end_date,
            start_time,
            end_time,
            signing_instructor: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn session(class_id: Uuid, date: Date, from: Time, to: Time) -> ClassSession {
        ClassSession {
            id: Uuid::new_v4(),
            class_id,
            session_date: date,
            start_time: from,
            end_time: to,
        }
    }

    #[test]
    fn explicit_sessions_win_over_class_range() {
        let class = class_with_range(
            Some(date!(2024 - 03 - 01)),
            Some(date!(2024 - 03 - 31)),
            None,
            None,
        );
        let sessions = vec![
            session(class.id, date!(2024 - 03 - 02), time!(08:00), time!(12:00)),
            session(class.id, date!(2024 - 03 - 01), time!(08:00), time!(12:00)),
        ];
        let plan = SessionPlan::for_class(&class, sessions).unwrap();
        assert_eq!(plan.total_sessions(), 2);
        let slots = plan.slots();
        // Ordered by date regardless of input order.
        assert_eq!(slots[0].date, date!(2024 - 03 - 01));
        assert_eq!(slots[1].date, date!(2024 - 03 - 02));
    }

    #[test]
    fn implicit_range_synthesizes_one_session_per_day() {
        let class = class_with_range(
            Some(date!(2024 - 03 - 01)),
            Some(date!(2024 - 03 - 04)),
            Some(time!(08:00)),
            Some(time!(12:00)),
        );
        let plan = SessionPlan::for_class(&class, vec![]).unwrap();
        assert_eq!(plan.total_sessions(), 4);
        let slots = plan.slots();
        assert_eq!(slots[0].date, date!(2024 - 03 - 01));
        assert_eq!(slots[3].date, date!(2024 - 03 - 04));
        assert!(slots.iter().all(|s| s.start_time == time!(08:00)));
    }

    #[test]
    fn implicit_range_defaults_to_whole_day_times() {
        let class = class_with_range(
            Some(date!(2024 - 03 - 01)),
            Some(date!(2024 - 03 - 01)),
            None,
            None,
        );
        let plan = SessionPlan::for_class(&class, vec![]).unwrap();
        let slot = plan.slot_on(date!(2024 - 03 - 01)).unwrap();
        assert_eq!(slot.start_time, time!(00:00));
        assert_eq!(slot.end_time, time!(23:59));
    }

    #[test]
    fn no_range_and_no_sessions_means_no_plan() {
        let class = class_with_range(None, None, None, None);
        assert!(SessionPlan::for_class(&class, vec![]).is_none());

        let half = class_with_range(Some(date!(2024 - 03 - 01)), None, None, None);
        assert!(SessionPlan::for_class(&half, vec![]).is_none());
    }

    #[test]
    fn times_on_unknown_dates_fall_back_to_conservative_bounds() {
        let class = class_with_range(
            Some(date!(2024 - 03 - 01)),
            Some(date!(2024 - 03 - 02)),
            None,
            None,
        );
        let plan = SessionPlan::for_class(&class, vec![]).unwrap();
        assert_eq!(plan.start_time_on(date!(2024 - 06 - 01)), time!(08:00));
        assert_eq!(plan.end_time_on(date!(2024 - 06 - 01)), time!(23:59));
        // Inside the range but no explicit times: 08:00 for window checks.
        assert_eq!(plan.start_time_on(date!(2024 - 03 - 01)), time!(08:00));
    }

    #[test]
    fn bounds_span_first_start_to_last_end() {
        let class = class_with_range(None, None, None, None);
        let sessions = vec![
            session(class.id, date!(2024 - 03 - 01), time!(08:00), time!(12:00)),
            session(class.id, date!(2024 - 03 - 04), time!(09:00), time!(13:00)),
        ];
        let plan = SessionPlan::for_class(&class, sessions).unwrap();
        let (start, end) = plan.bounds().unwrap();
        assert_eq!(
            start,
            PrimitiveDateTime::new(date!(2024 - 03 - 01), time!(08:00))
        );
        assert_eq!(
            end,
            PrimitiveDateTime::new(date!(2024 - 03 - 04), time!(13:00))
        );
    }

    #[test]
    fn explicit_plans_conflict_session_by_session() {
        let a_class = class_with_range(None, None, None, None);
        let b_class = class_with_range(None, None, None, None);
        let a = SessionPlan::for_class(
            &a_class,
            vec![session(
                a_class.id,
                date!(2024 - 04 - 01),
                time!(09:00),
                time!(10:00),
            )],
        )
        .unwrap();
        let b = SessionPlan::for_class(
            &b_class,
            vec![session(
                b_class.id,
                date!(2024 - 04 - 01),
                time!(10:00),
                time!(11:00),
            )],
        )
        .unwrap();
        // Half-open boundary at 10:00: no conflict.
        assert!(!plans_conflict(&a, &b));

        let c = SessionPlan::for_class(
            &b_class,
            vec![session(
                b_class.id,
                date!(2024 - 04 - 01),
                time!(09:30),
                time!(10:30),
            )],
        )
        .unwrap();
        assert!(plans_conflict(&a, &c));
        assert!(plans_conflict(&c, &b));
    }

    #[test]
    fn implicit_plan_compares_as_single_whole_range_interval() {
        let implicit = class_with_range(
            Some(date!(2024 - 04 - 01)),
            Some(date!(2024 - 04 - 05)),
            Some(time!(14:00)),
            Some(time!(18:00)),
        );
        let a = SessionPlan::for_class(&implicit, vec![]).unwrap();
        assert_eq!(a.intervals().len(), 1);

        let other = class_with_range(None, None, None, None);
        let b = SessionPlan::for_class(
            &other,
            vec![session(
                other.id,
                date!(2024 - 04 - 03),
                time!(17:00),
                time!(19:00),
            )],
        )
        .unwrap();
        assert!(plans_conflict(&a, &b));
    }
}
