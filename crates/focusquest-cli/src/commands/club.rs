use clap::Subcommand;
use uuid::Uuid;

use focusquest_core::{Store, StoreError};

use super::common::{load_game, CliResult};

#[derive(Subcommand)]
pub enum ClubAction {
    /// List all clubs
    List,
    /// Create a club (you join it automatically)
    Create {
        /// Club name
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// Join a club
    Join {
        /// Club id
        id: Uuid,
    },
    /// Leave a club
    Leave {
        /// Club id
        id: Uuid,
    },
    /// Show a club and its members
    Show {
        /// Club id
        id: Uuid,
    },
}

pub fn run(action: ClubAction) -> CliResult {
    let game = load_game()?;
    let store = game.store();
    match action {
        ClubAction::List => {
            let clubs = store.clubs()?;
            if clubs.is_empty() {
                println!("No clubs yet.");
            }
            for club in clubs {
                println!("{}  {}", club.name, club.id);
            }
        }
        ClubAction::Create { name, description } => {
            let club = store.create_club(&name, description.as_deref(), game.user_id())?;
            println!("Club created: {} ({})", club.name, club.id);
        }
        ClubAction::Join { id } => match store.join_club(id, game.user_id()) {
            Ok(()) => println!("Joined."),
            Err(StoreError::Constraint(_)) => println!("You're already a member."),
            Err(e) => return Err(e.into()),
        },
        ClubAction::Leave { id } => {
            store.leave_club(id, game.user_id())?;
            println!("Left.");
        }
        ClubAction::Show { id } => match store.club(id)? {
            None => println!("Club not found."),
            Some(club) => {
                println!("{}", club.name);
                if let Some(description) = &club.description {
                    println!("{description}");
                }
                for member in store.club_members(id)? {
                    println!("  {}  {}m", member.display_name(), member.total_focus_minutes);
                }
            }
        },
    }
    Ok(())
}
