use chrono::Utc;
use clap::Subcommand;

use focusquest_core::badge;
use focusquest_core::{ProfileChanges, Store};

use super::common::{load_game, progress_bar, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile, level, and streak
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the display name
    SetName {
        /// New display name
        name: String,
    },
    /// Set the daily focus goal in minutes
    SetGoal {
        /// Minutes per day
        minutes: u32,
    },
    /// Show badge progress
    Badges,
}

pub fn run(action: ProfileAction) -> CliResult {
    let game = load_game()?;
    match action {
        ProfileAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string(game.profile())?);
                return Ok(());
            }
            let profile = game.profile();
            let xp = game.xp();
            let streak = game.streak();
            println!("{}", profile.display_name());
            println!(
                "Level {} ({})  {}  {}/{} XP",
                xp.current_level,
                xp.title(),
                progress_bar(xp.progress_pct(), 15),
                xp.total_xp,
                xp.xp_to_next_level
            );
            let protection = if streak.is_protected(Utc::now()) {
                " (protected)"
            } else {
                ""
            };
            println!(
                "Streak {} day(s), longest {}{protection}",
                streak.current_streak, streak.longest_streak
            );
            println!("Daily goal: {} minutes", profile.daily_goal_minutes);
        }
        ProfileAction::SetName { name } => {
            let changes = ProfileChanges {
                name: Some(name),
                ..Default::default()
            };
            let profile = game.store().update_profile(game.user_id(), &changes)?;
            println!("Name set to {}", profile.display_name());
        }
        ProfileAction::SetGoal { minutes } => {
            let changes = ProfileChanges {
                daily_goal_minutes: Some(minutes),
                ..Default::default()
            };
            let profile = game.store().update_profile(game.user_id(), &changes)?;
            println!("Daily goal set to {} minutes", profile.daily_goal_minutes);
        }
        ProfileAction::Badges => {
            let definitions = game.store().badges()?;
            let earned = game.store().earned_badges(game.user_id())?;
            for view in badge::merge(&definitions, &earned) {
                let mark = if view.is_earned() { "x" } else { " " };
                println!(
                    "[{mark}] {} ({})  {}",
                    view.badge.name,
                    view.badge.rarity,
                    view.badge.description.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}
