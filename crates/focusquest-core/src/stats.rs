//! Session statistics.
//!
//! Folds completed focus sessions into the trailing-week minutes series,
//! daily-goal progress, and today's totals. All functions take an injected
//! `today` so the series is stable under test.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::session::FocusSession;

/// Minutes focused on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub minutes: u32,
}

/// The trailing seven days of focus minutes, oldest first, zero-filled
/// for days without completed sessions.
pub fn weekly_stats(sessions: &[FocusSession], today: NaiveDate) -> Vec<DayStat> {
    let mut week: Vec<DayStat> = dates::trailing_week(today)
        .into_iter()
        .map(|date| DayStat { date, minutes: 0 })
        .collect();

    for session in sessions.iter().filter(|s| !s.active) {
        let day = dates::day_of(session.started_at);
        if let Some(slot) = week.iter_mut().find(|s| s.date == day) {
            slot.minutes += session.duration_minutes.unwrap_or(0);
        }
    }
    week
}

/// Today's minutes -- the last entry of the weekly series.
pub fn today_minutes(week: &[DayStat]) -> u32 {
    week.last().map(|s| s.minutes).unwrap_or(0)
}

pub fn week_total(week: &[DayStat]) -> u32 {
    week.iter().map(|s| s.minutes).sum()
}

/// Rounded per-day average over the seven-day window.
pub fn week_average(week: &[DayStat]) -> u32 {
    (week_total(week) as f64 / 7.0).round() as u32
}

/// Daily-goal progress for the goal tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// 0.0 .. 100.0, clamped.
    pub percent: f64,
    /// Minutes still needed; zero once the goal is met.
    pub remaining: u32,
    pub complete: bool,
    /// Minutes past the goal; zero until the goal is met.
    pub bonus: u32,
}

impl GoalProgress {
    pub fn compute(today_minutes: u32, daily_goal: u32) -> Self {
        let goal = daily_goal.max(1);
        Self {
            percent: (today_minutes as f64 / goal as f64 * 100.0).min(100.0),
            remaining: goal.saturating_sub(today_minutes),
            complete: today_minutes >= goal,
            bonus: today_minutes.saturating_sub(goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FocusSession;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn completed(days_ago: i64, minutes: u32) -> FocusSession {
        let started = Utc
            .from_utc_datetime(&(day() - Duration::days(days_ago)).and_hms_opt(9, 0, 0).unwrap());
        FocusSession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            club_id: None,
            started_at: started,
            ended_at: Some(started + Duration::minutes(minutes as i64)),
            duration_minutes: Some(minutes),
            active: false,
        }
    }

    #[test]
    fn series_is_zero_filled_with_two_active_days() {
        let sessions = vec![completed(0, 30), completed(2, 45)];
        let week = weekly_stats(&sessions, day());
        assert_eq!(week.len(), 7);

        let non_zero: Vec<_> = week.iter().filter(|s| s.minutes > 0).collect();
        assert_eq!(non_zero.len(), 2);
        assert_eq!(week_total(&week), 75);
        assert_eq!(week.iter().filter(|s| s.minutes == 0).count(), 5);
        assert_eq!(today_minutes(&week), 30);
    }

    #[test]
    fn same_day_sessions_accumulate() {
        let sessions = vec![completed(0, 25), completed(0, 25)];
        let week = weekly_stats(&sessions, day());
        assert_eq!(today_minutes(&week), 50);
    }

    #[test]
    fn active_and_out_of_window_sessions_are_excluded() {
        let mut active = completed(0, 25);
        active.active = true;
        active.duration_minutes = None;
        let sessions = vec![active, completed(10, 60)];
        let week = weekly_stats(&sessions, day());
        assert_eq!(week_total(&week), 0);
    }

    #[test]
    fn goal_progress_clamps_and_tracks_bonus() {
        let under = GoalProgress::compute(45, 60);
        assert_eq!(under.remaining, 15);
        assert!(!under.complete);
        assert_eq!(under.bonus, 0);
        assert!((under.percent - 75.0).abs() < f64::EPSILON);

        let over = GoalProgress::compute(90, 60);
        assert_eq!(over.percent, 100.0);
        assert_eq!(over.remaining, 0);
        assert!(over.complete);
        assert_eq!(over.bonus, 30);
    }
}
