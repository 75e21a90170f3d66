//! The narrow data-access interface.
//!
//! Every piece of persistent state reaches the rest of the crate through
//! this trait. The production implementation is the SQLite-backed
//! [`crate::storage::Database`]; tests may substitute their own. All
//! methods are fallible, and callers are expected to survive any failure
//! without corrupting in-memory state.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::badge::{Badge, EarnedBadge};
use crate::club::Club;
use crate::error::StoreError;
use crate::profile::{Profile, ProfileChanges};
use crate::quest::{Quest, QuestProgress};
use crate::session::FocusSession;
use crate::streak::StreakState;
use crate::tasks::DailyTask;
use crate::xp::XpState;

pub trait Store {
    // ── XP and streak ───────────────────────────────────────────────

    /// Fetch the user's XP row, creating the level-1 default if absent.
    fn get_or_create_xp(&self, user: Uuid) -> Result<XpState, StoreError>;
    fn put_xp(&self, user: Uuid, state: &XpState) -> Result<(), StoreError>;

    /// Fetch the user's streak row, creating the empty default if absent.
    fn get_or_create_streak(&self, user: Uuid) -> Result<StreakState, StoreError>;
    fn put_streak(&self, user: Uuid, state: &StreakState) -> Result<(), StoreError>;

    // ── Quests ──────────────────────────────────────────────────────

    fn active_quests(&self) -> Result<Vec<Quest>, StoreError>;
    fn quest_progress(&self, user: Uuid, date: NaiveDate)
        -> Result<Vec<QuestProgress>, StoreError>;
    /// Insert or replace the progress row for (user, quest, day).
    fn put_quest_progress(&self, user: Uuid, progress: &QuestProgress)
        -> Result<(), StoreError>;

    // ── Daily tasks ─────────────────────────────────────────────────

    fn tasks(&self, user: Uuid, date: NaiveDate) -> Result<Vec<DailyTask>, StoreError>;
    fn create_task(&self, user: Uuid, title: &str, date: NaiveDate)
        -> Result<DailyTask, StoreError>;
    fn set_task_completed(
        &self,
        id: Uuid,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;

    // ── Focus sessions ──────────────────────────────────────────────

    /// Completed sessions started on or after `since` (a calendar day).
    fn completed_sessions_since(
        &self,
        user: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<FocusSession>, StoreError>;
    /// Completed sessions, most recent first.
    fn recent_sessions(&self, user: Uuid, limit: u32) -> Result<Vec<FocusSession>, StoreError>;
    fn active_session(&self, user: Uuid) -> Result<Option<FocusSession>, StoreError>;
    fn start_session(
        &self,
        user: Uuid,
        club: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<FocusSession, StoreError>;
    /// Mark a session ended. The transition happens at most once.
    fn end_session(
        &self,
        id: Uuid,
        duration_minutes: u32,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // ── Profiles ────────────────────────────────────────────────────

    fn get_or_create_profile(&self, user: Uuid) -> Result<Profile, StoreError>;
    fn update_profile(&self, user: Uuid, changes: &ProfileChanges)
        -> Result<Profile, StoreError>;
    fn add_focus_minutes(&self, user: Uuid, delta: u32) -> Result<(), StoreError>;

    // ── Badges ──────────────────────────────────────────────────────

    fn badges(&self) -> Result<Vec<Badge>, StoreError>;
    fn earned_badges(&self, user: Uuid) -> Result<Vec<EarnedBadge>, StoreError>;

    // ── Clubs ───────────────────────────────────────────────────────

    fn clubs(&self) -> Result<Vec<Club>, StoreError>;
    /// `Ok(None)` for an unknown club -- absence is not an error.
    fn club(&self, id: Uuid) -> Result<Option<Club>, StoreError>;
    /// Creates the club and auto-joins the creator.
    fn create_club(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
    ) -> Result<Club, StoreError>;
    /// Duplicate membership surfaces as [`StoreError::Constraint`].
    fn join_club(&self, club: Uuid, user: Uuid) -> Result<(), StoreError>;
    fn leave_club(&self, club: Uuid, user: Uuid) -> Result<(), StoreError>;
    fn club_members(&self, club: Uuid) -> Result<Vec<Profile>, StoreError>;

    // ── Leaderboard ─────────────────────────────────────────────────

    /// Top profiles by total focus minutes, descending.
    fn leaderboard(&self, limit: u32) -> Result<Vec<Profile>, StoreError>;

    // ── Key-value state ─────────────────────────────────────────────

    fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
