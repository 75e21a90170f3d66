//! Quest definitions and progress aggregation.
//!
//! Quests are immutable definitions (title, target, reward) assigned
//! daily, weekly, or monthly. Per-user progress rows are merged with the
//! definitions into display-ready views; quests with no progress row for
//! the day show zero progress.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    Daily,
    Weekly,
    Monthly,
}

/// What a quest's `target_value` counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestMetric {
    /// Minutes of completed focus time.
    FocusMinutes,
    /// Number of completed focus sessions.
    Sessions,
    /// Number of daily tasks checked off.
    TasksCompleted,
}

/// Immutable quest definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: QuestKind,
    pub metric: QuestMetric,
    pub target_value: u32,
    pub xp_reward: u32,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Per-user quest progress for one assignment day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest_id: Uuid,
    pub current_progress: u32,
    pub completed: bool,
    pub assigned_on: NaiveDate,
}

/// A quest definition joined with the user's progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestView {
    #[serde(flatten)]
    pub quest: Quest,
    pub current_progress: u32,
    pub completed: bool,
}

impl QuestView {
    /// Display percent toward the target, clamped at 100 even when the
    /// recorded progress overshoots.
    pub fn progress_percent(&self) -> f64 {
        if self.quest.target_value == 0 {
            return 100.0;
        }
        (self.current_progress as f64 / self.quest.target_value as f64 * 100.0).min(100.0)
    }
}

/// Join definitions with progress rows assigned on `today`.
///
/// Definition order is preserved. The `completed` flag is taken from the
/// stored progress row, not recomputed from the target.
pub fn merge(definitions: &[Quest], progress: &[QuestProgress], today: NaiveDate) -> Vec<QuestView> {
    definitions
        .iter()
        .map(|quest| {
            let row = progress
                .iter()
                .find(|p| p.quest_id == quest.id && p.assigned_on == today);
            QuestView {
                quest: quest.clone(),
                current_progress: row.map(|p| p.current_progress).unwrap_or(0),
                completed: row.map(|p| p.completed).unwrap_or(false),
            }
        })
        .collect()
}

/// Quests bucketed for the home screen. Monthly quests are not shown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestBoard {
    pub daily: Vec<QuestView>,
    pub weekly: Vec<QuestView>,
}

impl QuestBoard {
    pub fn partition(views: Vec<QuestView>) -> Self {
        let mut board = QuestBoard::default();
        for view in views {
            match view.quest.kind {
                QuestKind::Daily => board.daily.push(view),
                QuestKind::Weekly => board.weekly.push(view),
                QuestKind::Monthly => {}
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(title: &str, kind: QuestKind, target: u32) -> Quest {
        Quest {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            kind,
            metric: QuestMetric::FocusMinutes,
            target_value: target,
            xp_reward: 50,
            icon: None,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn missing_progress_defaults_to_zero_incomplete() {
        let defs = vec![quest("Focus 25 minutes", QuestKind::Daily, 25)];
        let views = merge(&defs, &[], day());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].current_progress, 0);
        assert!(!views[0].completed);
    }

    #[test]
    fn progress_from_another_day_is_ignored() {
        let defs = vec![quest("Focus 25 minutes", QuestKind::Daily, 25)];
        let stale = QuestProgress {
            quest_id: defs[0].id,
            current_progress: 20,
            completed: false,
            assigned_on: day() - chrono::Duration::days(1),
        };
        let views = merge(&defs, &[stale], day());
        assert_eq!(views[0].current_progress, 0);
    }

    #[test]
    fn overshoot_clamps_percent_but_reports_stored_flag() {
        let defs = vec![quest("Focus 10 minutes", QuestKind::Daily, 10)];
        let progress = QuestProgress {
            quest_id: defs[0].id,
            current_progress: 12,
            completed: false,
            assigned_on: day(),
        };
        let views = merge(&defs, &[progress], day());
        assert_eq!(views[0].progress_percent(), 100.0);
        // The flag mirrors the source record; aggregation never recomputes it.
        assert!(!views[0].completed);
    }

    #[test]
    fn partition_buckets_by_kind_preserving_order() {
        let defs = vec![
            quest("a", QuestKind::Daily, 1),
            quest("b", QuestKind::Weekly, 1),
            quest("c", QuestKind::Daily, 1),
            quest("d", QuestKind::Monthly, 1),
        ];
        let board = QuestBoard::partition(merge(&defs, &[], day()));
        let daily: Vec<_> = board.daily.iter().map(|v| v.quest.title.as_str()).collect();
        assert_eq!(daily, ["a", "c"]);
        assert_eq!(board.weekly.len(), 1);
    }
}
