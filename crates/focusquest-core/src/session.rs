//! Focus session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timed focus period.
///
/// Created active with `started_at` set and no duration; transitions
/// exactly once to inactive when ended, gaining `ended_at` and
/// `duration_minutes`. At most one active session per user -- the facade
/// refuses to start a second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Set when the session was started from a club room.
    pub club_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub active: bool,
}

impl FocusSession {
    pub fn is_completed(&self) -> bool {
        !self.active && self.duration_minutes.is_some()
    }
}
