//! Daily streak tracking.
//!
//! A streak is the number of consecutive calendar days with at least one
//! qualifying activity. Evaluation is pure: callers inject `today` and
//! `now`, and the state is updated at most once per calendar day --
//! re-evaluating on an already-counted day returns the state unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;

/// Per-user streak state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    /// Never decreases; raised to `current_streak` after every update.
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    /// While set and in the future, a missed day continues the streak
    /// instead of resetting it.
    pub protected_until: Option<DateTime<Utc>>,
}

impl StreakState {
    /// Fold today's activity into the streak.
    ///
    /// Continuation from yesterday increments; a first-ever activity
    /// starts at 1; a gap of two or more days resets to 1 unless an
    /// unexpired protection window covers it. A protected gap *increments*
    /// the streak rather than carrying it over unchanged -- that is the
    /// shipped behavior and downstream accounting depends on it, so it is
    /// kept as-is.
    pub fn evaluate(&self, today: NaiveDate, now: DateTime<Utc>) -> StreakState {
        if self.last_activity_date == Some(today) {
            // Already counted today.
            return self.clone();
        }

        let current = match self.last_activity_date {
            Some(last) if last == dates::yesterday(today) => self.current_streak + 1,
            None => 1,
            Some(_) => {
                if self.protected_until.is_some_and(|until| until > now) {
                    self.current_streak + 1
                } else {
                    1
                }
            }
        };

        StreakState {
            current_streak: current,
            longest_streak: self.longest_streak.max(current),
            last_activity_date: Some(today),
            protected_until: self.protected_until,
        }
    }

    /// Whether an unexpired protection window is in effect.
    pub fn is_protected(&self, now: DateTime<Utc>) -> bool {
        self.protected_until.is_some_and(|until| until > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(d: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&d.and_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn first_activity_starts_at_one() {
        let state = StreakState::default();
        let today = date(2024, 3, 15);
        let next = state.evaluate(today, noon(today));
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 1);
        assert_eq!(next.last_activity_date, Some(today));
    }

    #[test]
    fn same_day_reevaluation_is_a_noop() {
        let today = date(2024, 3, 15);
        let state = StreakState::default().evaluate(today, noon(today));
        let again = state.evaluate(today, noon(today));
        assert_eq!(again, state);
    }

    #[test]
    fn consecutive_day_increments() {
        let today = date(2024, 3, 15);
        let state = StreakState {
            current_streak: 4,
            longest_streak: 9,
            last_activity_date: Some(date(2024, 3, 14)),
            protected_until: None,
        };
        let next = state.evaluate(today, noon(today));
        assert_eq!(next.current_streak, 5);
        assert_eq!(next.longest_streak, 9);
    }

    #[test]
    fn unprotected_gap_resets_to_one() {
        let today = date(2024, 3, 15);
        let state = StreakState {
            current_streak: 12,
            longest_streak: 12,
            last_activity_date: Some(date(2024, 3, 12)),
            protected_until: None,
        };
        let next = state.evaluate(today, noon(today));
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 12);
    }

    #[test]
    fn protected_gap_continues_the_streak() {
        let today = date(2024, 3, 15);
        let state = StreakState {
            current_streak: 12,
            longest_streak: 12,
            last_activity_date: Some(date(2024, 3, 12)),
            protected_until: Some(noon(today) + Duration::hours(6)),
        };
        let next = state.evaluate(today, noon(today));
        // Protection continues with an increment, not a plain carry-over.
        assert_eq!(next.current_streak, 13);
        assert_eq!(next.longest_streak, 13);
    }

    #[test]
    fn expired_protection_resets() {
        let today = date(2024, 3, 15);
        let state = StreakState {
            current_streak: 12,
            longest_streak: 12,
            last_activity_date: Some(date(2024, 3, 12)),
            protected_until: Some(noon(today) - Duration::days(1)),
        };
        let next = state.evaluate(today, noon(today));
        assert_eq!(next.current_streak, 1);
    }

    #[test]
    fn longest_never_decreases() {
        let mut state = StreakState {
            current_streak: 3,
            longest_streak: 20,
            last_activity_date: Some(date(2024, 3, 10)),
            protected_until: None,
        };
        for day in 11..=20 {
            let today = date(2024, 3, day);
            state = state.evaluate(today, noon(today));
            assert!(state.longest_streak >= 20);
        }
    }
}
