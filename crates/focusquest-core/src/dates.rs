//! Calendar-day helpers.
//!
//! All streak, quest, and stats rules operate on UTC calendar days. The
//! original data model keys days by the UTC date of each timestamp, so a
//! "day" here is always `DateTime<Utc>::date_naive()`. Callers inject
//! `today` explicitly -- nothing in this crate reads the wall clock on its
//! own, which keeps every rule deterministic under test.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// The UTC calendar day a timestamp falls on.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// The day before `today`.
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// The trailing seven calendar days ending with (and including) `today`,
/// oldest first.
pub fn trailing_week(today: NaiveDate) -> [NaiveDate; 7] {
    let mut days = [today; 7];
    for (i, slot) in days.iter_mut().enumerate() {
        *slot = today - Duration::days(6 - i as i64);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_of_truncates_to_utc_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap();
        assert_eq!(day_of(ts), date(2024, 3, 15));
    }

    #[test]
    fn yesterday_crosses_month_boundary() {
        assert_eq!(yesterday(date(2024, 3, 1)), date(2024, 2, 29));
    }

    #[test]
    fn trailing_week_is_ordered_and_ends_today() {
        let week = trailing_week(date(2024, 3, 15));
        assert_eq!(week[0], date(2024, 3, 9));
        assert_eq!(week[6], date(2024, 3, 15));
        for pair in week.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }
}
