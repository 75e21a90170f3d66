//! User profiles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_DAILY_GOAL_MINUTES: u32 = 60;

/// Public profile row; `total_focus_minutes` drives the leaderboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub daily_goal_minutes: u32,
    pub total_focus_minutes: u64,
}

impl Profile {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            name: None,
            avatar_url: None,
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
            total_focus_minutes: 0,
        }
    }

    /// Display name with the original "Anonymous" fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Anonymous")
    }
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub daily_goal_minutes: Option<u32>,
}
