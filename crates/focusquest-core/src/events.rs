use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::TimerState;

/// Every state change in the system produces an Event.
/// The frontend prints them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        total_seconds: u32,
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        total_seconds: u32,
        at: DateTime<Utc>,
    },
    PresetSelected {
        minutes: u32,
        at: DateTime<Utc>,
    },
    /// A focus countdown finished, naturally or by an early finish.
    /// `elapsed_minutes` is what downstream accounting credits.
    TimerCompleted {
        elapsed_minutes: u32,
        /// True when the countdown ran to zero; false for an early finish.
        natural: bool,
        at: DateTime<Utc>,
    },
    XpGained {
        amount: u32,
        leveled_up: bool,
        new_level: u32,
        at: DateTime<Utc>,
    },
    StreakUpdated {
        current_streak: u32,
        longest_streak: u32,
        /// False when the day was already counted.
        extended: bool,
        at: DateTime<Utc>,
    },
    QuestCompleted {
        quest_id: Uuid,
        title: String,
        xp_reward: u32,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: Uuid,
        club_id: Option<Uuid>,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: Uuid,
        duration_minutes: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        remaining_seconds: u32,
        total_seconds: u32,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    GoalReached {
        date: NaiveDate,
        minutes: u32,
        daily_goal: u32,
        at: DateTime<Utc>,
    },
}
