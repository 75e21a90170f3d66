use clap::Subcommand;

use focusquest_core::QuestView;

use super::common::{load_game, progress_bar, CliResult};

#[derive(Subcommand)]
pub enum QuestAction {
    /// Show the quest board
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_bucket(label: &str, quests: &[QuestView]) {
    if quests.is_empty() {
        return;
    }
    println!("{label}:");
    for view in quests {
        let mark = if view.completed { "x" } else { " " };
        println!(
            "  [{mark}] {}  {} {}/{} (+{} XP)",
            view.quest.title,
            progress_bar(view.progress_percent(), 10),
            view.current_progress,
            view.quest.target_value,
            view.quest.xp_reward,
        );
    }
}

pub fn run(action: QuestAction) -> CliResult {
    let game = load_game()?;
    match action {
        QuestAction::List { json } => {
            let board = game.quest_board();
            if json {
                println!("{}", serde_json::to_string(&board)?);
            } else {
                print_bucket("Daily", &board.daily);
                print_bucket("Weekly", &board.weekly);
            }
        }
    }
    Ok(())
}
