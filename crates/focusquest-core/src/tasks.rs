//! User-authored daily tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One checklist item, scoped to a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub task_date: NaiveDate,
}
