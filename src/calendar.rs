//! Day-granularity calendar arithmetic.
//!
//! All dates are [`NaiveDate`] values: no time of day and no timezone.
//! Durations are **inclusive** of both endpoints, so a one-day task has
//! `duration == 1` and `start == end`.
//!
//! # Invariant
//! For every `start` and `duration >= 1`:
//! `day_count(start, end_from_duration(start, duration)) == duration`.
//!
//! None of these functions panic. Shifts past the representable range
//! saturate at [`NaiveDate::MIN`] / [`NaiveDate::MAX`].

use chrono::{Days, NaiveDate};

/// Inclusive number of days from `start` to `end`.
///
/// Never less than 1, even if `end < start`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gantt_core::calendar::day_count;
///
/// let d = |day| NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
/// assert_eq!(day_count(d(1), d(5)), 5);
/// assert_eq!(day_count(d(3), d(3)), 1);
/// assert_eq!(day_count(d(5), d(1)), 1);
/// ```
pub fn day_count(start: NaiveDate, end: NaiveDate) -> i64 {
    (days_between(start, end) + 1).max(1)
}

/// End date of a task starting on `start` and lasting `duration` days.
///
/// Returns `start + (duration - 1)` days. Durations below 1 are treated
/// as 1 so the result is never before `start`.
pub fn end_from_duration(start: NaiveDate, duration: i64) -> NaiveDate {
    add_days(start, duration.max(1) - 1)
}

/// Shifts `date` by a signed number of whole days.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    // Wider than the whole NaiveDate range.
    const MAX_SHIFT: i64 = 400_000_000;
    let days = days.clamp(-MAX_SHIFT, MAX_SHIFT);
    let step = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(step).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(step).unwrap_or(NaiveDate::MIN)
    }
}

/// Signed number of days from `from` to `to` (exclusive difference).
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_count_inclusive() {
        assert_eq!(day_count(date(2023, 1, 1), date(2023, 1, 5)), 5);
        assert_eq!(day_count(date(2023, 1, 1), date(2023, 1, 1)), 1);
    }

    #[test]
    fn test_day_count_floor() {
        assert_eq!(day_count(date(2023, 1, 10), date(2023, 1, 1)), 1);
    }

    #[test]
    fn test_day_count_across_leap_day() {
        assert_eq!(day_count(date(2024, 2, 28), date(2024, 3, 1)), 3);
        assert_eq!(day_count(date(2023, 2, 28), date(2023, 3, 1)), 2);
    }

    #[test]
    fn test_end_from_duration() {
        assert_eq!(end_from_duration(date(2023, 1, 1), 5), date(2023, 1, 5));
        assert_eq!(end_from_duration(date(2023, 1, 1), 1), date(2023, 1, 1));
        assert_eq!(end_from_duration(date(2023, 12, 30), 4), date(2024, 1, 2));
    }

    #[test]
    fn test_end_from_duration_floors_at_one_day() {
        assert_eq!(end_from_duration(date(2023, 1, 1), 0), date(2023, 1, 1));
        assert_eq!(end_from_duration(date(2023, 1, 1), -3), date(2023, 1, 1));
    }

    #[test]
    fn test_inclusive_round_trip() {
        let starts = [date(2023, 1, 1), date(2024, 2, 27), date(1999, 12, 31)];
        for start in starts {
            for duration in 1..=400 {
                let end = end_from_duration(start, duration);
                assert_eq!(day_count(start, end), duration, "start {start}, duration {duration}");
            }
        }
    }

    #[test]
    fn test_add_days_signed() {
        assert_eq!(add_days(date(2023, 1, 31), 1), date(2023, 2, 1));
        assert_eq!(add_days(date(2023, 1, 1), -1), date(2022, 12, 31));
        assert_eq!(add_days(date(2023, 1, 1), 0), date(2023, 1, 1));
    }

    #[test]
    fn test_add_days_saturates() {
        assert_eq!(add_days(NaiveDate::MAX, 10), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -10), NaiveDate::MIN);
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2023, 1, 1), date(2023, 1, 10)), 9);
        assert_eq!(days_between(date(2023, 1, 10), date(2023, 1, 1)), -9);
    }
}
