//! Shared helpers for CLI commands.

use chrono::Utc;
use focusquest_core::xp::level_title;
use focusquest_core::{Database, Event, Gamification};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the database and build the facade snapshot for the local user,
/// as of the current UTC calendar day.
pub fn load_game() -> Result<Gamification<Database>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let user = db.current_user()?;
    let today = Utc::now().date_naive();
    Ok(Gamification::load(db, user, today)?)
}

/// Print the user-facing line for each gamification event.
pub fn print_events(events: &[Event]) {
    for event in events {
        match event {
            Event::SessionCompleted {
                duration_minutes, ..
            } => {
                println!("Great focus! You completed {duration_minutes} minutes.");
            }
            Event::QuestCompleted {
                title, xp_reward, ..
            } => {
                println!("Quest complete: {title} (+{xp_reward} XP)");
            }
            Event::XpGained {
                amount,
                leveled_up,
                new_level,
                ..
            } => {
                if *leveled_up {
                    println!(
                        "+{amount} XP -- level up! You reached level {new_level} ({})",
                        level_title(*new_level)
                    );
                } else {
                    println!("+{amount} XP");
                }
            }
            Event::StreakUpdated {
                current_streak,
                extended,
                ..
            } => {
                if *extended {
                    println!("Streak: {current_streak} day(s)");
                }
            }
            Event::GoalReached {
                minutes,
                daily_goal,
                ..
            } => {
                println!("Daily goal reached: {minutes}/{daily_goal} minutes");
            }
            _ => {}
        }
    }
}

/// Render a simple progress bar like `[#####.....]`.
pub fn progress_bar(pct: f64, width: usize) -> String {
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// `MM:SS` rendering of a second count.
pub fn clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
