use clap::Subcommand;
use uuid::Uuid;

use focusquest_core::{leaderboard, Store};

use super::common::{load_game, CliResult};

#[derive(Subcommand)]
pub enum LeaderboardAction {
    /// Global rankings by total focus time
    Global {
        /// Entries to show
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Rankings within one club
    Club {
        /// Club id
        id: Uuid,
        /// Entries to show
        #[arg(long, default_value = "10")]
        limit: u32,
    },
}

fn print_board(entries: &[leaderboard::LeaderboardEntry]) {
    for entry in entries {
        println!(
            "{:>3}. {}  {}m",
            entry.rank,
            entry.name.as_deref().unwrap_or("Anonymous"),
            entry.total_focus_minutes
        );
    }
}

pub fn run(action: LeaderboardAction) -> CliResult {
    let game = load_game()?;
    let store = game.store();
    match action {
        LeaderboardAction::Global { limit } => {
            let board = leaderboard::rank(store.leaderboard(limit)?);
            print_board(&board);
        }
        LeaderboardAction::Club { id, limit } => {
            if store.club(id)?.is_none() {
                println!("Club not found.");
                return Ok(());
            }
            let mut board = leaderboard::rank_club(store.club_members(id)?);
            board.truncate(limit as usize);
            print_board(&board);
        }
    }
    Ok(())
}
