//! Gamification facade.
//!
//! Owns the only mutable in-memory snapshot of the user's gamification
//! state and orchestrates the pure engines (XP, streak, quests, stats,
//! insights) against a [`Store`]. The store remains the source of truth:
//! a reload rebuilds the snapshot from scratch, and any store failure
//! leaves the snapshot unchanged or rolled back.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::dates;
use crate::error::{CoreError, ValidationError};
use crate::events::Event;
use crate::insight::{self, Insight};
use crate::quest::{self, QuestBoard, QuestMetric, QuestProgress, QuestView};
use crate::session::FocusSession;
use crate::stats::{self, DayStat, GoalProgress};
use crate::store::Store;
use crate::streak::StreakState;
use crate::tasks::DailyTask;
use crate::xp::XpState;
use crate::profile::Profile;

/// How many completed sessions the home screen lists.
const RECENT_SESSION_LIMIT: u32 = 10;

pub struct Gamification<S: Store> {
    store: S,
    user_id: Uuid,
    profile: Profile,
    xp: XpState,
    streak: StreakState,
    quests: Vec<QuestView>,
    tasks: Vec<DailyTask>,
    week: Vec<DayStat>,
    recent: Vec<FocusSession>,
    today: NaiveDate,
}

impl<S: Store> Gamification<S> {
    /// Build the snapshot for `user_id` as of `today`.
    ///
    /// Missing XP, streak, and profile rows are created with their
    /// defaults by the store.
    pub fn load(store: S, user_id: Uuid, today: NaiveDate) -> Result<Self, CoreError> {
        let profile = store.get_or_create_profile(user_id)?;
        let xp = store.get_or_create_xp(user_id)?;
        let streak = store.get_or_create_streak(user_id)?;

        let definitions = store.active_quests()?;
        let progress = store.quest_progress(user_id, today)?;
        let quests = quest::merge(&definitions, &progress, today);

        let tasks = store.tasks(user_id, today)?;

        let week_start = dates::trailing_week(today)[0];
        let sessions = store.completed_sessions_since(user_id, week_start)?;
        let week = stats::weekly_stats(&sessions, today);

        let recent = store.recent_sessions(user_id, RECENT_SESSION_LIMIT)?;

        Ok(Self {
            store,
            user_id,
            profile,
            xp,
            streak,
            quests,
            tasks,
            week,
            recent,
            today,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn xp(&self) -> &XpState {
        &self.xp
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn quests(&self) -> &[QuestView] {
        &self.quests
    }

    pub fn quest_board(&self) -> QuestBoard {
        QuestBoard::partition(self.quests.clone())
    }

    pub fn tasks(&self) -> &[DailyTask] {
        &self.tasks
    }

    pub fn week(&self) -> &[DayStat] {
        &self.week
    }

    pub fn recent_sessions(&self) -> &[FocusSession] {
        &self.recent
    }

    pub fn today_minutes(&self) -> u32 {
        stats::today_minutes(&self.week)
    }

    pub fn goal_progress(&self) -> GoalProgress {
        GoalProgress::compute(self.today_minutes(), self.profile.daily_goal_minutes)
    }

    pub fn insights(&self) -> Vec<Insight> {
        insight::generate(
            &self.week,
            Some(&self.streak),
            self.profile.total_focus_minutes,
            self.profile.daily_goal_minutes,
        )
    }

    pub fn active_session(&self) -> Result<Option<FocusSession>, CoreError> {
        Ok(self.store.active_session(self.user_id)?)
    }

    // ── XP and streak ───────────────────────────────────────────────

    /// Grant XP. Negative amounts are a validation error and never reach
    /// the store; a store failure leaves the snapshot unchanged.
    pub fn add_xp(&mut self, amount: i64, now: DateTime<Utc>) -> Result<Event, CoreError> {
        if amount < 0 {
            return Err(ValidationError::NegativeXpGain { amount }.into());
        }
        let amount = u32::try_from(amount).map_err(|_| ValidationError::InvalidValue {
            field: "amount".into(),
            message: format!("{amount} exceeds the maximum XP grant"),
        })?;
        let gain = self.xp.apply_gain(amount);
        self.store.put_xp(self.user_id, &gain.state)?;
        self.xp = gain.state;
        Ok(Event::XpGained {
            amount,
            leveled_up: gain.leveled_up,
            new_level: gain.new_level,
            at: now,
        })
    }

    /// Fold today's activity into the streak. A same-day repeat is a
    /// no-op that issues no store write.
    pub fn update_streak(&mut self, now: DateTime<Utc>) -> Result<Event, CoreError> {
        let next = self.streak.evaluate(self.today, now);
        let extended = next != self.streak;
        if extended {
            self.store.put_streak(self.user_id, &next)?;
            self.streak = next;
        }
        Ok(Event::StreakUpdated {
            current_streak: self.streak.current_streak,
            longest_streak: self.streak.longest_streak,
            extended,
            at: now,
        })
    }

    // ── Daily tasks ─────────────────────────────────────────────────

    /// Create a task for today. Empty titles are rejected before any
    /// store call.
    pub fn add_task(&mut self, title: &str) -> Result<DailyTask, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTaskTitle.into());
        }
        let task = self.store.create_task(self.user_id, title, self.today)?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flip a task's completion. The local flip happens first and is
    /// reverted if the store write fails; checking a task off also feeds
    /// task-metric quests.
    pub fn toggle_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<Vec<Event>, CoreError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::Custom(format!("unknown task {id}")))?;

        let completed = !self.tasks[index].completed;
        self.tasks[index].completed = completed;

        if let Err(err) = self.store.set_task_completed(id, completed, now) {
            self.tasks[index].completed = !completed;
            return Err(err.into());
        }

        if completed {
            self.bump_quests(QuestMetric::TasksCompleted, 1, now)
        } else {
            Ok(Vec::new())
        }
    }

    /// Remove a task. The local removal is reverted if the store delete
    /// fails.
    pub fn delete_task(&mut self, id: Uuid) -> Result<(), CoreError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::Custom(format!("unknown task {id}")))?;

        let removed = self.tasks.remove(index);
        if let Err(err) = self.store.delete_task(id) {
            self.tasks.insert(index, removed);
            return Err(err.into());
        }
        Ok(())
    }

    // ── Focus sessions ──────────────────────────────────────────────

    /// Open a new active session. Refused while one is already active.
    pub fn start_session(
        &mut self,
        club_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(FocusSession, Event), CoreError> {
        if self.store.active_session(self.user_id)?.is_some() {
            return Err(ValidationError::SessionAlreadyActive.into());
        }
        let session = self.store.start_session(self.user_id, club_id, now)?;
        let event = Event::SessionStarted {
            session_id: session.id,
            club_id,
            at: now,
        };
        Ok((session, event))
    }

    /// Close a session and run the full accounting chain: lifetime
    /// minutes, weekly series, quest progress, XP, streak, goal.
    pub fn complete_session(
        &mut self,
        session_id: Uuid,
        minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, CoreError> {
        let goal_before = self.goal_progress();

        self.store.end_session(session_id, minutes, now)?;
        self.store.add_focus_minutes(self.user_id, minutes)?;
        self.profile.total_focus_minutes += u64::from(minutes);

        if let Some(slot) = self.week.iter_mut().find(|s| s.date == self.today) {
            slot.minutes += minutes;
        }
        self.recent = self.store.recent_sessions(self.user_id, RECENT_SESSION_LIMIT)?;

        let mut events = vec![Event::SessionCompleted {
            session_id,
            duration_minutes: minutes,
            at: now,
        }];
        events.extend(self.bump_quests(QuestMetric::FocusMinutes, minutes, now)?);
        events.extend(self.bump_quests(QuestMetric::Sessions, 1, now)?);
        events.push(self.add_xp(i64::from(minutes), now)?);
        events.push(self.update_streak(now)?);

        let goal_after = self.goal_progress();
        if !goal_before.complete && goal_after.complete {
            events.push(Event::GoalReached {
                date: self.today,
                minutes: self.today_minutes(),
                daily_goal: self.profile.daily_goal_minutes,
                at: now,
            });
        }
        Ok(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Advance every quest counting `metric` by `amount`. A quest that
    /// crosses its target for the first time is marked completed and
    /// awards its XP exactly once.
    fn bump_quests(
        &mut self,
        metric: QuestMetric,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, CoreError> {
        let mut events = Vec::new();
        let mut rewards = Vec::new();

        for view in self.quests.iter_mut().filter(|v| v.quest.metric == metric) {
            let progress = view.current_progress + amount;
            let completed_now = !view.completed && progress >= view.quest.target_value;
            let row = QuestProgress {
                quest_id: view.quest.id,
                current_progress: progress,
                completed: view.completed || completed_now,
                assigned_on: self.today,
            };
            self.store.put_quest_progress(self.user_id, &row)?;
            view.current_progress = progress;
            if completed_now {
                view.completed = true;
                events.push(Event::QuestCompleted {
                    quest_id: view.quest.id,
                    title: view.quest.title.clone(),
                    xp_reward: view.quest.xp_reward,
                    at: now,
                });
                rewards.push(view.quest.xp_reward);
            }
        }

        for reward in rewards {
            events.push(self.add_xp(i64::from(reward), now)?);
        }
        Ok(events)
    }
}
