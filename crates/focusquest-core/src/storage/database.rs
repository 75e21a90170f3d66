//! SQLite-based persistence.
//!
//! Provides the production [`Store`] implementation:
//! - Per-user XP, streak, and profile rows
//! - Quest definitions and per-day progress
//! - Daily tasks and focus sessions
//! - Clubs, memberships, badges, and the leaderboard
//! - Key-value store for application state (e.g. the persisted timer)

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::data_dir;
use crate::badge::{Badge, EarnedBadge};
use crate::club::Club;
use crate::error::StoreError;
use crate::profile::{Profile, ProfileChanges, DEFAULT_DAILY_GOAL_MINUTES};
use crate::quest::{Quest, QuestKind, QuestMetric, QuestProgress};
use crate::session::FocusSession;
use crate::store::Store;
use crate::streak::StreakState;
use crate::tasks::DailyTask;
use crate::xp::{xp_required_for_level, XpState};

const DAY_FMT: &str = "%Y-%m-%d";

/// SQLite database behind the [`Store`] trait.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/focusquest/focusquest.db`.
    ///
    /// Creates the database file, schema, and stock quest/badge
    /// definitions if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?
            .join("focusquest.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path,
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS user_xp (
                    user_id          TEXT PRIMARY KEY,
                    total_xp         INTEGER NOT NULL DEFAULT 0,
                    current_level    INTEGER NOT NULL DEFAULT 1,
                    xp_to_next_level INTEGER NOT NULL DEFAULT 100,
                    updated_at       TEXT
                );

                CREATE TABLE IF NOT EXISTS user_streaks (
                    user_id            TEXT PRIMARY KEY,
                    current_streak     INTEGER NOT NULL DEFAULT 0,
                    longest_streak     INTEGER NOT NULL DEFAULT 0,
                    last_activity_date TEXT,
                    protected_until    TEXT,
                    updated_at         TEXT
                );

                CREATE TABLE IF NOT EXISTS quests (
                    id           TEXT PRIMARY KEY,
                    title        TEXT NOT NULL,
                    description  TEXT,
                    kind         TEXT NOT NULL,
                    metric       TEXT NOT NULL,
                    target_value INTEGER NOT NULL,
                    xp_reward    INTEGER NOT NULL,
                    icon         TEXT,
                    is_active    INTEGER NOT NULL DEFAULT 1
                );

                CREATE TABLE IF NOT EXISTS user_quests (
                    user_id          TEXT NOT NULL,
                    quest_id         TEXT NOT NULL,
                    current_progress INTEGER NOT NULL DEFAULT 0,
                    is_completed     INTEGER NOT NULL DEFAULT 0,
                    assigned_on      TEXT NOT NULL,
                    PRIMARY KEY (user_id, quest_id, assigned_on)
                );

                CREATE TABLE IF NOT EXISTS daily_tasks (
                    id           TEXT PRIMARY KEY,
                    user_id      TEXT NOT NULL,
                    title        TEXT NOT NULL,
                    is_completed INTEGER NOT NULL DEFAULT 0,
                    task_date    TEXT NOT NULL,
                    created_at   TEXT NOT NULL,
                    completed_at TEXT
                );

                CREATE TABLE IF NOT EXISTS focus_sessions (
                    id               TEXT PRIMARY KEY,
                    user_id          TEXT NOT NULL,
                    club_id          TEXT,
                    started_at       TEXT NOT NULL,
                    ended_at         TEXT,
                    duration_minutes INTEGER,
                    is_active        INTEGER NOT NULL DEFAULT 1
                );

                CREATE TABLE IF NOT EXISTS profiles (
                    id                  TEXT PRIMARY KEY,
                    name                TEXT,
                    avatar_url          TEXT,
                    daily_goal_minutes  INTEGER NOT NULL DEFAULT 60,
                    total_focus_minutes INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS badges (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    description TEXT,
                    icon        TEXT,
                    kind        TEXT NOT NULL,
                    rarity      TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS user_badges (
                    user_id   TEXT NOT NULL,
                    badge_id  TEXT NOT NULL,
                    earned_at TEXT NOT NULL,
                    PRIMARY KEY (user_id, badge_id)
                );

                CREATE TABLE IF NOT EXISTS clubs (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    description TEXT,
                    created_by  TEXT NOT NULL,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS club_members (
                    club_id   TEXT NOT NULL,
                    user_id   TEXT NOT NULL,
                    joined_at TEXT NOT NULL,
                    PRIMARY KEY (club_id, user_id)
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                -- Create indexes for common query patterns
                CREATE INDEX IF NOT EXISTS idx_sessions_user_started
                    ON focus_sessions(user_id, started_at);
                CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_active
                    ON focus_sessions(user_id) WHERE is_active = 1;
                CREATE INDEX IF NOT EXISTS idx_tasks_user_date
                    ON daily_tasks(user_id, task_date);
                CREATE INDEX IF NOT EXISTS idx_profiles_minutes
                    ON profiles(total_focus_minutes);",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        self.seed()
    }

    /// Insert the stock quest and badge definitions. Idempotent.
    fn seed(&self) -> Result<(), StoreError> {
        let quests: &[(&str, &str, &str, &str, u32, u32, &str)] = &[
            (
                "7b3e7a36-1f5d-4b46-9f6a-2f1d2e5c0a01",
                "Focus 25 minutes",
                "daily",
                "focus_minutes",
                25,
                50,
                "clock",
            ),
            (
                "7b3e7a36-1f5d-4b46-9f6a-2f1d2e5c0a02",
                "Complete 3 tasks",
                "daily",
                "tasks_completed",
                3,
                30,
                "check-circle",
            ),
            (
                "7b3e7a36-1f5d-4b46-9f6a-2f1d2e5c0a03",
                "Finish a focus session",
                "daily",
                "sessions",
                1,
                20,
                "sunrise",
            ),
            (
                "7b3e7a36-1f5d-4b46-9f6a-2f1d2e5c0a04",
                "Focus 300 minutes",
                "weekly",
                "focus_minutes",
                300,
                200,
                "trophy",
            ),
            (
                "7b3e7a36-1f5d-4b46-9f6a-2f1d2e5c0a05",
                "Complete 10 sessions",
                "weekly",
                "sessions",
                10,
                150,
                "flame",
            ),
        ];
        for (id, title, kind, metric, target, reward, icon) in quests {
            self.conn.execute(
                "INSERT OR IGNORE INTO quests (id, title, kind, metric, target_value, xp_reward, icon)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, title, kind, metric, target, reward, icon],
            )?;
        }

        let badges: &[(&str, &str, &str, &str, &str)] = &[
            (
                "9d0c4f12-6a9e-4d7b-8c1f-3e2b1a4d0b01",
                "First Focus",
                "Complete your first focus session",
                "session",
                "common",
            ),
            (
                "9d0c4f12-6a9e-4d7b-8c1f-3e2b1a4d0b02",
                "Week Streak",
                "Seven consecutive days of focus",
                "streak",
                "rare",
            ),
            (
                "9d0c4f12-6a9e-4d7b-8c1f-3e2b1a4d0b03",
                "Century Club",
                "One hundred hours of deep work",
                "lifetime",
                "epic",
            ),
        ];
        for (id, name, description, kind, rarity) in badges {
            self.conn.execute(
                "INSERT OR IGNORE INTO badges (id, name, description, kind, rarity)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, description, kind, rarity],
            )?;
        }
        Ok(())
    }

    /// The local user's id, created on first use and kept in the kv
    /// table.
    pub fn current_user(&self) -> Result<Uuid, StoreError> {
        if let Some(raw) = self.kv_get("current_user")? {
            return parse_uuid(&raw);
        }
        let id = Uuid::new_v4();
        self.kv_set("current_user", &id.to_string())?;
        Ok(id)
    }
}

// ── Row parsing helpers ──────────────────────────────────────────────

fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::QueryFailed(format!("bad uuid '{raw}': {e}")))
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::QueryFailed(format!("bad timestamp '{raw}': {e}")))
}

fn parse_day(raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, DAY_FMT)
        .map_err(|e| StoreError::QueryFailed(format!("bad date '{raw}': {e}")))
}

fn quest_kind(raw: &str) -> Result<QuestKind, StoreError> {
    match raw {
        "daily" => Ok(QuestKind::Daily),
        "weekly" => Ok(QuestKind::Weekly),
        "monthly" => Ok(QuestKind::Monthly),
        _ => Err(StoreError::QueryFailed(format!("bad quest kind '{raw}'"))),
    }
}

fn quest_metric(raw: &str) -> Result<QuestMetric, StoreError> {
    match raw {
        "focus_minutes" => Ok(QuestMetric::FocusMinutes),
        "sessions" => Ok(QuestMetric::Sessions),
        "tasks_completed" => Ok(QuestMetric::TasksCompleted),
        _ => Err(StoreError::QueryFailed(format!("bad quest metric '{raw}'"))),
    }
}

type SessionRow = (
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<u32>,
    bool,
);

fn session_from_row(row: SessionRow) -> Result<FocusSession, StoreError> {
    let (id, user_id, club_id, started_at, ended_at, duration_minutes, active) = row;
    Ok(FocusSession {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        club_id: club_id.as_deref().map(parse_uuid).transpose()?,
        started_at: parse_ts(&started_at)?,
        ended_at: ended_at.as_deref().map(parse_ts).transpose()?,
        duration_minutes,
        active,
    })
}

fn profile_from_row(row: (String, Option<String>, Option<String>, u32, u64)) -> Result<Profile, StoreError> {
    let (id, name, avatar_url, daily_goal_minutes, total_focus_minutes) = row;
    Ok(Profile {
        id: parse_uuid(&id)?,
        name,
        avatar_url,
        daily_goal_minutes,
        total_focus_minutes,
    })
}

impl Store for Database {
    fn get_or_create_xp(&self, user: Uuid) -> Result<XpState, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT total_xp, current_level, xp_to_next_level FROM user_xp WHERE user_id = ?1",
                params![user.to_string()],
                |row| {
                    Ok(XpState {
                        total_xp: row.get(0)?,
                        current_level: row.get(1)?,
                        xp_to_next_level: row.get(2)?,
                    })
                },
            )
            .map(Some)
            .or_else(ignore_no_rows)?;

        match row {
            Some(state) => Ok(state),
            None => {
                let state = XpState::default();
                debug_assert_eq!(state.xp_to_next_level, xp_required_for_level(1));
                self.put_xp(user, &state)?;
                Ok(state)
            }
        }
    }

    fn put_xp(&self, user: Uuid, state: &XpState) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO user_xp (user_id, total_xp, current_level, xp_to_next_level, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                 total_xp = excluded.total_xp,
                 current_level = excluded.current_level,
                 xp_to_next_level = excluded.xp_to_next_level,
                 updated_at = excluded.updated_at",
            params![
                user.to_string(),
                state.total_xp,
                state.current_level,
                state.xp_to_next_level,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn get_or_create_streak(&self, user: Uuid) -> Result<StreakState, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT current_streak, longest_streak, last_activity_date, protected_until
                 FROM user_streaks WHERE user_id = ?1",
                params![user.to_string()],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .map(Some)
            .or_else(ignore_no_rows)?;

        match row {
            Some((current, longest, last, protected)) => Ok(StreakState {
                current_streak: current,
                longest_streak: longest,
                last_activity_date: last.as_deref().map(parse_day).transpose()?,
                protected_until: protected.as_deref().map(parse_ts).transpose()?,
            }),
            None => {
                let state = StreakState::default();
                self.put_streak(user, &state)?;
                Ok(state)
            }
        }
    }

    fn put_streak(&self, user: Uuid, state: &StreakState) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO user_streaks
                 (user_id, current_streak, longest_streak, last_activity_date, protected_until, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                 current_streak = excluded.current_streak,
                 longest_streak = excluded.longest_streak,
                 last_activity_date = excluded.last_activity_date,
                 protected_until = excluded.protected_until,
                 updated_at = excluded.updated_at",
            params![
                user.to_string(),
                state.current_streak,
                state.longest_streak,
                state.last_activity_date.map(|d| d.format(DAY_FMT).to_string()),
                state.protected_until.map(|t| t.to_rfc3339()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn active_quests(&self) -> Result<Vec<Quest>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, kind, metric, target_value, xp_reward, icon
             FROM quests WHERE is_active = 1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, u32>(6)?,
                    row.get::<_, Option<String>>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, description, kind, metric, target, reward, icon)| {
                Ok(Quest {
                    id: parse_uuid(&id)?,
                    title,
                    description,
                    kind: quest_kind(&kind)?,
                    metric: quest_metric(&metric)?,
                    target_value: target,
                    xp_reward: reward,
                    icon,
                })
            })
            .collect()
    }

    fn quest_progress(
        &self,
        user: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<QuestProgress>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT quest_id, current_progress, is_completed, assigned_on
             FROM user_quests WHERE user_id = ?1 AND assigned_on = ?2",
        )?;
        let rows = stmt
            .query_map(
                params![user.to_string(), date.format(DAY_FMT).to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(quest_id, progress, completed, assigned)| {
                Ok(QuestProgress {
                    quest_id: parse_uuid(&quest_id)?,
                    current_progress: progress,
                    completed,
                    assigned_on: parse_day(&assigned)?,
                })
            })
            .collect()
    }

    fn put_quest_progress(
        &self,
        user: Uuid,
        progress: &QuestProgress,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO user_quests (user_id, quest_id, current_progress, is_completed, assigned_on)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id, quest_id, assigned_on) DO UPDATE SET
                 current_progress = excluded.current_progress,
                 is_completed = excluded.is_completed",
            params![
                user.to_string(),
                progress.quest_id.to_string(),
                progress.current_progress,
                progress.completed,
                progress.assigned_on.format(DAY_FMT).to_string(),
            ],
        )?;
        Ok(())
    }

    fn tasks(&self, user: Uuid, date: NaiveDate) -> Result<Vec<DailyTask>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, is_completed, task_date FROM daily_tasks
             WHERE user_id = ?1 AND task_date = ?2 ORDER BY created_at",
        )?;
        let rows = stmt
            .query_map(
                params![user.to_string(), date.format(DAY_FMT).to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, title, completed, task_date)| {
                Ok(DailyTask {
                    id: parse_uuid(&id)?,
                    title,
                    completed,
                    task_date: parse_day(&task_date)?,
                })
            })
            .collect()
    }

    fn create_task(
        &self,
        user: Uuid,
        title: &str,
        date: NaiveDate,
    ) -> Result<DailyTask, StoreError> {
        let task = DailyTask {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            task_date: date,
        };
        self.conn.execute(
            "INSERT INTO daily_tasks (id, user_id, title, is_completed, task_date, created_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
            params![
                task.id.to_string(),
                user.to_string(),
                task.title,
                date.format(DAY_FMT).to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(task)
    }

    fn set_task_completed(
        &self,
        id: Uuid,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE daily_tasks SET is_completed = ?2, completed_at = ?3 WHERE id = ?1",
            params![
                id.to_string(),
                completed,
                completed.then(|| at.to_rfc3339()),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("task {id}")));
        }
        Ok(())
    }

    fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM daily_tasks WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("task {id}")));
        }
        Ok(())
    }

    fn completed_sessions_since(
        &self,
        user: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<FocusSession>, StoreError> {
        let floor = since.format(DAY_FMT).to_string();
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, club_id, started_at, ended_at, duration_minutes, is_active
             FROM focus_sessions
             WHERE user_id = ?1 AND is_active = 0 AND started_at >= ?2
             ORDER BY started_at",
        )?;
        let rows = stmt
            .query_map(params![user.to_string(), format!("{floor}T00:00:00+00:00")], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<Result<Vec<SessionRow>, _>>()?;
        rows.into_iter().map(session_from_row).collect()
    }

    fn recent_sessions(&self, user: Uuid, limit: u32) -> Result<Vec<FocusSession>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, club_id, started_at, ended_at, duration_minutes, is_active
             FROM focus_sessions
             WHERE user_id = ?1 AND is_active = 0
             ORDER BY started_at DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![user.to_string(), limit], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<Result<Vec<SessionRow>, _>>()?;
        rows.into_iter().map(session_from_row).collect()
    }

    fn active_session(&self, user: Uuid) -> Result<Option<FocusSession>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, club_id, started_at, ended_at, duration_minutes, is_active
                 FROM focus_sessions WHERE user_id = ?1 AND is_active = 1",
                params![user.to_string()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                },
            )
            .map(Some)
            .or_else(ignore_no_rows)?;
        row.map(session_from_row).transpose()
    }

    fn start_session(
        &self,
        user: Uuid,
        club: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<FocusSession, StoreError> {
        let session = FocusSession {
            id: Uuid::new_v4(),
            user_id: user,
            club_id: club,
            started_at: at,
            ended_at: None,
            duration_minutes: None,
            active: true,
        };
        self.conn.execute(
            "INSERT INTO focus_sessions (id, user_id, club_id, started_at, is_active)
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![
                session.id.to_string(),
                user.to_string(),
                club.map(|c| c.to_string()),
                at.to_rfc3339(),
            ],
        )?;
        Ok(session)
    }

    fn end_session(
        &self,
        id: Uuid,
        duration_minutes: u32,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE focus_sessions
             SET ended_at = ?2, duration_minutes = ?3, is_active = 0
             WHERE id = ?1 AND is_active = 1",
            params![id.to_string(), at.to_rfc3339(), duration_minutes],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("active session {id}")));
        }
        Ok(())
    }

    fn get_or_create_profile(&self, user: Uuid) -> Result<Profile, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, avatar_url, daily_goal_minutes, total_focus_minutes
                 FROM profiles WHERE id = ?1",
                params![user.to_string()],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .map(Some)
            .or_else(ignore_no_rows)?;

        match row {
            Some(raw) => profile_from_row(raw),
            None => {
                self.conn.execute(
                    "INSERT INTO profiles (id, daily_goal_minutes) VALUES (?1, ?2)",
                    params![user.to_string(), DEFAULT_DAILY_GOAL_MINUTES],
                )?;
                Ok(Profile::new(user))
            }
        }
    }

    fn update_profile(
        &self,
        user: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Profile, StoreError> {
        self.conn.execute(
            "UPDATE profiles SET
                 name = COALESCE(?2, name),
                 avatar_url = COALESCE(?3, avatar_url),
                 daily_goal_minutes = COALESCE(?4, daily_goal_minutes)
             WHERE id = ?1",
            params![
                user.to_string(),
                changes.name,
                changes.avatar_url,
                changes.daily_goal_minutes,
            ],
        )?;
        self.get_or_create_profile(user)
    }

    fn add_focus_minutes(&self, user: Uuid, delta: u32) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE profiles SET total_focus_minutes = total_focus_minutes + ?2 WHERE id = ?1",
            params![user.to_string(), delta],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("profile {user}")));
        }
        Ok(())
    }

    fn badges(&self) -> Result<Vec<Badge>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, icon, kind, rarity FROM badges ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(id, name, description, icon, kind, rarity)| {
                Ok(Badge {
                    id: parse_uuid(&id)?,
                    name,
                    description,
                    icon,
                    kind,
                    rarity,
                })
            })
            .collect()
    }

    fn earned_badges(&self, user: Uuid) -> Result<Vec<EarnedBadge>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT badge_id, earned_at FROM user_badges WHERE user_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![user.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(badge_id, earned_at)| {
                Ok(EarnedBadge {
                    badge_id: parse_uuid(&badge_id)?,
                    earned_at: parse_ts(&earned_at)?,
                })
            })
            .collect()
    }

    fn clubs(&self) -> Result<Vec<Club>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_by, created_at
             FROM clubs ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(club_from_row).collect()
    }

    fn club(&self, id: Uuid) -> Result<Option<Club>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, created_by, created_at FROM clubs WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .map(Some)
            .or_else(ignore_no_rows)?;
        row.map(club_from_row).transpose()
    }

    fn create_club(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
    ) -> Result<Club, StoreError> {
        let club = Club {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_by,
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO clubs (id, name, description, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                club.id.to_string(),
                club.name,
                club.description,
                created_by.to_string(),
                club.created_at.to_rfc3339(),
            ],
        )?;
        // The creator is a member from the start.
        self.join_club(club.id, created_by)?;
        Ok(club)
    }

    fn join_club(&self, club: Uuid, user: Uuid) -> Result<(), StoreError> {
        if self.club(club)?.is_none() {
            return Err(StoreError::NotFound(format!("club {club}")));
        }
        self.conn.execute(
            "INSERT INTO club_members (club_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
            params![club.to_string(), user.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn leave_club(&self, club: Uuid, user: Uuid) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM club_members WHERE club_id = ?1 AND user_id = ?2",
            params![club.to_string(), user.to_string()],
        )?;
        Ok(())
    }

    fn club_members(&self, club: Uuid) -> Result<Vec<Profile>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.name, p.avatar_url, p.daily_goal_minutes, p.total_focus_minutes
             FROM club_members m JOIN profiles p ON p.id = m.user_id
             WHERE m.club_id = ?1
             ORDER BY m.joined_at",
        )?;
        let rows = stmt
            .query_map(params![club.to_string()], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(profile_from_row).collect()
    }

    fn leaderboard(&self, limit: u32) -> Result<Vec<Profile>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, avatar_url, daily_goal_minutes, total_focus_minutes
             FROM profiles ORDER BY total_focus_minutes DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(profile_from_row).collect()
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(ignore_no_rows)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

fn club_from_row(
    row: (String, String, Option<String>, String, String),
) -> Result<Club, StoreError> {
    let (id, name, description, created_by, created_at) = row;
    Ok(Club {
        id: parse_uuid(&id)?,
        name,
        description,
        created_by: parse_uuid(&created_by)?,
        created_at: parse_ts(&created_at)?,
    })
}

/// Collapse `QueryReturnedNoRows` into `Ok(None)`.
fn ignore_no_rows<T>(err: rusqlite::Error) -> Result<Option<T>, StoreError> {
    match err {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    }
}
