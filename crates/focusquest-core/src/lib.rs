//! # FocusQuest Core Library
//!
//! This library provides the core business logic for the FocusQuest
//! gamified focus timer. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary; any GUI would be
//! a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine that requires the
//!   caller to invoke `tick()` once per second
//! - **Gamification**: Pure engines for XP/levels, streaks, quests,
//!   weekly stats, and insights, orchestrated by a facade
//! - **Storage**: SQLite-based persistence behind the narrow [`Store`]
//!   trait, plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: Core countdown state machine
//! - [`Gamification`]: Facade owning the in-memory gamification snapshot
//! - [`Database`]: Production [`Store`] implementation
//! - [`Config`]: Application configuration management

pub mod badge;
pub mod club;
pub mod dates;
pub mod error;
pub mod events;
pub mod gamification;
pub mod insight;
pub mod leaderboard;
pub mod profile;
pub mod quest;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;
pub mod tasks;
pub mod timer;
pub mod xp;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use gamification::Gamification;
pub use insight::{Insight, InsightKind};
pub use profile::{Profile, ProfileChanges};
pub use quest::{Quest, QuestBoard, QuestKind, QuestMetric, QuestProgress, QuestView};
pub use session::FocusSession;
pub use stats::{DayStat, GoalProgress};
pub use storage::{Config, Database};
pub use store::Store;
pub use streak::StreakState;
pub use tasks::DailyTask;
pub use timer::{FocusTimer, Preset, TimerState};
pub use xp::{level_title, xp_required_for_level, XpState};
