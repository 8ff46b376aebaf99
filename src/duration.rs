//! Sleep duration arithmetic over bare clock times
//!
//! Bedtime and wake time carry no date. A wake time whose clock value is
//! strictly earlier than bedtime is read as belonging to the next calendar day
//! (a one-day offset); otherwise both fall on the same day. Identical clock
//! values therefore yield zero hours, not twenty-four.

use chrono::{NaiveTime, TimeDelta};

/// Milliseconds in one hour, used to express spans as fractional hours
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Which calendar day the wake event falls on, relative to bedtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOffset {
    /// Wake on the same day as bedtime
    SameDay,
    /// Wake on the following day (midnight rollover)
    NextDay,
}

impl DayOffset {
    /// Determine the offset for a bedtime / wake time pair
    pub fn between(bedtime: NaiveTime, waketime: NaiveTime) -> Self {
        if waketime < bedtime {
            DayOffset::NextDay
        } else {
            DayOffset::SameDay
        }
    }

    /// Number of whole days added to the wake time
    pub fn days(self) -> i64 {
        match self {
            DayOffset::SameDay => 0,
            DayOffset::NextDay => 1,
        }
    }
}

/// Time slept between `bedtime` and `waketime` as a span
pub fn sleep_span(bedtime: NaiveTime, waketime: NaiveTime) -> TimeDelta {
    let offset = DayOffset::between(bedtime, waketime);
    waketime.signed_duration_since(bedtime) + TimeDelta::days(offset.days())
}

/// Hours slept between `bedtime` and `waketime`
///
/// Total over all clock-time pairs and never negative.
///
/// ```rust
/// use chrono::NaiveTime;
/// use sleeplog::duration::compute_duration;
///
/// let bed = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
/// let wake = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
/// assert_eq!(compute_duration(bed, wake), 8.0);
/// ```
pub fn compute_duration(bedtime: NaiveTime, waketime: NaiveTime) -> f64 {
    let span = sleep_span(bedtime, waketime);
    debug_assert!(span >= TimeDelta::zero(), "negative sleep span {span}");
    span.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_overnight_rollover() {
        assert_eq!(compute_duration(hm(23, 0), hm(7, 0)), 8.0);
        assert_eq!(compute_duration(hm(22, 30), hm(6, 0)), 7.5);
        assert_eq!(DayOffset::between(hm(23, 0), hm(7, 0)), DayOffset::NextDay);
    }

    #[test]
    fn test_same_day_after_midnight() {
        // Falling asleep after midnight is a same-day pair
        assert_eq!(compute_duration(hm(1, 0), hm(9, 0)), 8.0);
        assert_eq!(DayOffset::between(hm(1, 0), hm(9, 0)), DayOffset::SameDay);
    }

    #[test]
    fn test_identical_times_are_zero() {
        assert_eq!(compute_duration(hm(23, 0), hm(23, 0)), 0.0);
        assert_eq!(compute_duration(hm(0, 0), hm(0, 0)), 0.0);
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(compute_duration(hm(23, 45), hm(6, 0)), 6.25);
        let hours = compute_duration(hm(0, 0), hm(0, 1));
        assert!((hours - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_one_minute_short_of_a_day() {
        let hours = compute_duration(hm(7, 1), hm(7, 0));
        assert!((hours - (24.0 - 1.0 / 60.0)).abs() < 1e-12);
    }

    fn clock() -> impl Strategy<Value = NaiveTime> {
        (0u32..24, 0u32..60).prop_map(|(h, m)| hm(h, m))
    }

    proptest! {
        #[test]
        fn test_same_day_is_plain_difference(bed in clock(), wake in clock()) {
            prop_assume!(wake >= bed);
            let expected = (wake - bed).num_minutes() as f64 / 60.0;
            prop_assert!((compute_duration(bed, wake) - expected).abs() < 1e-9);
        }

        #[test]
        fn test_rollover_is_positive_and_wraps(bed in clock(), wake in clock()) {
            prop_assume!(wake < bed);
            let hours = compute_duration(bed, wake);
            let to_midnight = 24.0 - (bed - hm(0, 0)).num_minutes() as f64 / 60.0;
            let from_midnight = (wake - hm(0, 0)).num_minutes() as f64 / 60.0;
            prop_assert!(hours > 0.0);
            prop_assert!((hours - (to_midnight + from_midnight)).abs() < 1e-9);
        }

        #[test]
        fn test_never_negative_and_below_a_day(bed in clock(), wake in clock()) {
            let hours = compute_duration(bed, wake);
            prop_assert!(hours >= 0.0);
            prop_assert!(hours < 24.0);
        }
    }
}
