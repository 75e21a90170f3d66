use chrono::Utc;
use clap::Subcommand;
use uuid::Uuid;

use super::common::{load_game, print_events, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task for today
    Add {
        /// Task title
        title: String,
    },
    /// List today's tasks
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task's completion
    Toggle {
        /// Task id
        id: Uuid,
    },
    /// Delete a task
    Rm {
        /// Task id
        id: Uuid,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let mut game = load_game()?;
    match action {
        TaskAction::Add { title } => {
            let task = game.add_task(&title)?;
            println!("Task created: {} ({})", task.title, task.id);
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string(game.tasks())?);
            } else if game.tasks().is_empty() {
                println!("No tasks for today.");
            } else {
                for task in game.tasks() {
                    let mark = if task.completed { "x" } else { " " };
                    println!("[{mark}] {}  {}", task.title, task.id);
                }
            }
        }
        TaskAction::Toggle { id } => {
            let events = game.toggle_task(id, Utc::now())?;
            let task = game.tasks().iter().find(|t| t.id == id);
            if let Some(task) = task {
                let state = if task.completed { "done" } else { "open" };
                println!("Task {state}: {}", task.title);
            }
            print_events(&events);
        }
        TaskAction::Rm { id } => {
            game.delete_task(id)?;
            println!("Task deleted.");
        }
    }
    Ok(())
}
