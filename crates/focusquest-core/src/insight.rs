//! Rule-based motivational insights.
//!
//! Generates up to two short messages from the weekly series, streak, and
//! lifetime totals. Rules run in a fixed order and the result is truncated
//! to the first two, so the output is fully deterministic -- no sampling.

use serde::{Deserialize, Serialize};

use crate::stats::{self, DayStat};
use crate::streak::StreakState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Encouraging,
    Milestone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub message: String,
    pub kind: InsightKind,
}

impl Insight {
    fn new(message: impl Into<String>, kind: InsightKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Pick at most two insights, in rule order: streak milestones, today's
/// progress against the goal, the weekly trend, lifetime milestones.
pub fn generate(
    week: &[DayStat],
    streak: Option<&StreakState>,
    total_focus_minutes: u64,
    daily_goal: u32,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let today = stats::today_minutes(week);
    let week_avg = stats::week_average(week);

    if let Some(streak) = streak {
        match streak.current_streak {
            7..=13 => insights.push(Insight::new(
                "You're on a week-long streak! Keep the momentum going.",
                InsightKind::Milestone,
            )),
            14..=29 => insights.push(Insight::new(
                "Two weeks strong! You're building a powerful habit.",
                InsightKind::Milestone,
            )),
            n if n >= 30 => insights.push(Insight::new(
                "A month of consistent focus! You're unstoppable.",
                InsightKind::Milestone,
            )),
            _ => {}
        }
    }

    if today == 0 {
        insights.push(Insight::new(
            "Start your first session today to keep your streak alive!",
            InsightKind::Encouraging,
        ));
    } else if today < daily_goal {
        insights.push(Insight::new(
            format!("Just {} more minutes to hit your daily goal!", daily_goal - today),
            InsightKind::Encouraging,
        ));
    } else {
        insights.push(Insight::new(
            "Daily goal crushed! You're on fire today.",
            InsightKind::Positive,
        ));
    }

    if week_avg as f64 > daily_goal as f64 * 0.9 {
        insights.push(Insight::new(
            "You're on track to beat your weekly average!",
            InsightKind::Positive,
        ));
    }

    let total_hours = total_focus_minutes / 60;
    if total_hours >= 100 {
        insights.push(Insight::new(
            "Century club member! 100+ hours of deep work.",
            InsightKind::Milestone,
        ));
    } else if total_hours >= 50 {
        insights.push(Insight::new(
            "Half-century achieved! Keep pushing boundaries.",
            InsightKind::Milestone,
        ));
    } else if total_hours >= 10 {
        insights.push(Insight::new(
            "10+ hours logged. Building strong habits!",
            InsightKind::Positive,
        ));
    }

    insights.truncate(2);
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week(minutes: [u32; 7]) -> Vec<DayStat> {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        crate::dates::trailing_week(today)
            .into_iter()
            .zip(minutes)
            .map(|(date, minutes)| DayStat { date, minutes })
            .collect()
    }

    #[test]
    fn empty_week_yields_exactly_one_start_today_insight() {
        let insights = generate(&week([0; 7]), None, 0, 60);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Encouraging);
        assert!(insights[0].message.contains("Start your first session"));
    }

    #[test]
    fn streak_milestone_comes_first_and_output_is_capped_at_two() {
        let streak = StreakState {
            current_streak: 8,
            longest_streak: 8,
            last_activity_date: None,
            protected_until: None,
        };
        // Goal met today and a strong week: three rules fire, two survive.
        let insights = generate(&week([60; 7]), Some(&streak), 120 * 60, 60);
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::Milestone);
        assert!(insights[0].message.contains("week-long streak"));
        assert_eq!(insights[1].kind, InsightKind::Positive);
        assert!(insights[1].message.contains("Daily goal crushed"));
    }

    #[test]
    fn remaining_minutes_message_counts_down_to_goal() {
        let insights = generate(&week([0, 0, 0, 0, 0, 0, 45]), None, 0, 60);
        assert!(insights[0].message.contains("Just 15 more minutes"));
    }

    #[test]
    fn streak_tiers_select_distinct_messages() {
        for (count, needle) in [
            (7, "week-long"),
            (14, "Two weeks"),
            (30, "month of consistent focus"),
        ] {
            let streak = StreakState {
                current_streak: count,
                longest_streak: count,
                last_activity_date: None,
                protected_until: None,
            };
            let insights = generate(&week([0; 7]), Some(&streak), 0, 60);
            assert!(
                insights[0].message.contains(needle),
                "streak {count} should mention {needle}"
            );
        }
    }

    #[test]
    fn lifetime_milestones_need_room_in_the_cap() {
        // Only the daily-progress rule fires ahead of the century rule here.
        let insights = generate(&week([0; 7]), None, 101 * 60, 60);
        assert_eq!(insights.len(), 2);
        assert!(insights[1].message.contains("Century club"));
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let streak = StreakState {
            current_streak: 15,
            longest_streak: 15,
            last_activity_date: None,
            protected_until: None,
        };
        let a = generate(&week([30; 7]), Some(&streak), 600, 60);
        let b = generate(&week([30; 7]), Some(&streak), 600, 60);
        assert_eq!(a, b);
    }
}
