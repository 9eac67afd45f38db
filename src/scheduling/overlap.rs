use time::macros::format_description;
use time::{Date, Time};

/// A date range (inclusive on both ends) paired with a daily time-of-day
/// range. A single session is the degenerate case where `start_date ==
/// end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeInterval {
    pub start_date: Date,
    pub end_date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

impl DateTimeInterval {
    pub fn single_day(date: Date, start_time: Time, end_time: Time) -> Self {
        Self {
            start_date: date,
            end_date: date,
            start_time,
            end_time,
        }
    }
}

/// Two intervals conflict when their date ranges intersect (inclusive)
/// and their time-of-day ranges intersect half-open, so a session ending
/// at 12:00 and one starting at 12:00 do not conflict.
pub fn intervals_conflict(a: &DateTimeInterval, b: &DateTimeInterval) -> bool {
    dates_intersect(a.start_date, a.end_date, b.start_date, b.end_date)
        && times_intersect(a.start_time, a.end_time, b.start_time, b.end_time)
}

fn dates_intersect(a_start: Date, a_end: Date, b_start: Date, b_end: Date) -> bool {
    a_start <= b_end && b_start <= a_end
}

fn times_intersect(a_from: Time, a_to: Time, b_from: Time, b_to: Time) -> bool {
    a_from < b_to && b_from < a_to
}

/// Lenient string-input variant used for advisory pre-checks: malformed
/// dates or times report "no conflict" instead of failing. Strict
/// validation belongs to the caller; this check is a safety net.
#[allow(clippy::too_many_arguments)]
pub fn conflicts_lenient(
    a_start: &str,
    a_end: &str,
    a_from: &str,
    a_to: &str,
    b_start: &str,
    b_end: &str,
    b_from: &str,
    b_to: &str,
) -> bool {
    let parsed = (
        parse_date(a_start),
        parse_date(a_end),
        parse_time(a_from),
        parse_time(a_to),
        parse_date(b_start),
        parse_date(b_end),
        parse_time(b_from),
        parse_time(b_to),
    );
    match parsed {
        (
            Some(asd),
            Some(aed),
            Some(aft),
            Some(att),
            Some(bsd),
            Some(bed),
            Some(bft),
            Some(btt),
        ) => intervals_conflict(
            &DateTimeInterval {
                start_date: asd,
                end_date: aed,
                start_time: aft,
                end_time: att,
            },
            &DateTimeInterval {
                start_date: bsd,
                end_date: bed,
                start_time: bft,
                end_time: btt,
            },
        ),
        _ => false,
    }
}

/// Parses `YYYY-MM-DD`, returning `None` on anything malformed.
pub fn parse_date(input: &str) -> Option<Date> {
    Date::parse(input, format_description!("[year]-[month]-[day]")).ok()
}

/// Parses `HH:MM`, returning `None` on anything malformed.
pub fn parse_time(input: &str) -> Option<Time> {
    Time::parse(input, format_description!("[hour]:[minute]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn interval(date: Date, from: Time, to: Time) -> DateTimeInterval {
        DateTimeInterval::single_day(date, from, to)
    }

    #[test]
    fn overlapping_times_on_same_date_conflict() {
        let a = interval(date!(2024 - 04 - 01), time!(09:00), time!(11:00));
        let b = interval(date!(2024 - 04 - 01), time!(10:00), time!(12:00));
        assert!(intervals_conflict(&a, &b));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = interval(date!(2024 - 04 - 01), time!(09:00), time!(11:00));
        let b = interval(date!(2024 - 04 - 01), time!(10:00), time!(12:00));
        assert_eq!(intervals_conflict(&a, &b), intervals_conflict(&b, &a));

        let c = interval(date!(2024 - 04 - 02), time!(09:00), time!(11:00));
        assert_eq!(intervals_conflict(&a, &c), intervals_conflict(&c, &a));
    }

    #[test]
    fn interval_conflicts_with_itself_when_time_range_nonempty() {
        let a = interval(date!(2024 - 04 - 01), time!(09:00), time!(11:00));
        assert!(intervals_conflict(&a, &a));
    }

    #[test]
    fn empty_time_range_never_conflicts() {
        let a = interval(date!(2024 - 04 - 01), time!(09:00), time!(09:00));
        assert!(!intervals_conflict(&a, &a));
    }

    #[test]
    fn back_to_back_sessions_do_not_conflict() {
        // Half-open boundary: one ends at 12:00, the other starts at 12:00.
        let a = interval(date!(2024 - 04 - 01), time!(08:00), time!(12:00));
        let b = interval(date!(2024 - 04 - 01), time!(12:00), time!(16:00));
        assert!(!intervals_conflict(&a, &b));
        assert!(!intervals_conflict(&b, &a));
    }

    #[test]
    fn disjoint_dates_do_not_conflict() {
        let a = interval(date!(2024 - 04 - 01), time!(09:00), time!(11:00));
        let b = interval(date!(2024 - 04 - 02), time!(09:00), time!(11:00));
        assert!(!intervals_conflict(&a, &b));
    }

    #[test]
    fn multi_day_ranges_intersect_inclusively() {
        let a = DateTimeInterval {
            start_date: date!(2024 - 04 - 01),
            end_date: date!(2024 - 04 - 05),
            start_time: time!(09:00),
            end_time: time!(11:00),
        };
        let b = DateTimeInterval {
            start_date: date!(2024 - 04 - 05),
            end_date: date!(2024 - 04 - 10),
            start_time: time!(10:00),
            end_time: time!(12:00),
        };
        assert!(intervals_conflict(&a, &b));
    }

    #[test]
    fn lenient_check_reports_no_conflict_on_malformed_input() {
        assert!(!conflicts_lenient(
            "2024-04-01",
            "2024-04-01",
            "9am",
            "11:00",
            "2024-04-01",
            "2024-04-01",
            "10:00",
            "12:00",
        ));
        assert!(!conflicts_lenient(
            "not-a-date",
            "2024-04-01",
            "09:00",
            "11:00",
            "2024-04-01",
            "2024-04-01",
            "10:00",
            "12:00",
        ));
    }

    #[test]
    fn lenient_check_agrees_with_typed_check_on_valid_input() {
        assert!(conflicts_lenient(
            "2024-04-01",
            "2024-04-01",
            "09:00",
            "11:00",
            "2024-04-01",
            "2024-04-01",
            "10:00",
            "12:00",
        ));
    }

    #[test]
    fn parse_helpers_reject_out_of_range_values() {
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("12:61").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }
}
