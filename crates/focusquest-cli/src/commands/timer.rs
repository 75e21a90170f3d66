use std::io::Write;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use uuid::Uuid;

use focusquest_core::{Config, Database, Event, FocusTimer, Gamification, Preset, Store, TimerState};

use super::common::{clock, load_game, print_events, progress_bar, CliResult};

const ENGINE_KEY: &str = "timer_engine";
const SAVED_AT_KEY: &str = "timer_saved_at";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the countdown and open a focus session
    Start {
        /// Countdown length in minutes (idle timer only)
        #[arg(long)]
        minutes: Option<u32>,
        /// Club to attribute the session to
        #[arg(long)]
        club: Option<Uuid>,
    },
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// End the session now, crediting elapsed time
    Finish,
    /// Reset to idle state
    Reset,
    /// Pick a preset duration (idle timer only)
    Preset {
        /// Duration in minutes
        minutes: u32,
    },
    /// Run the countdown in the foreground until it completes
    Watch,
    /// Print current timer state
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_engine(db: &Database) -> FocusTimer {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<FocusTimer>(&json) {
            return engine;
        }
    }
    let minutes = Config::load()
        .map(|c| c.timer.default_minutes)
        .unwrap_or(focusquest_core::timer::DEFAULT_MINUTES);
    FocusTimer::new(minutes)
}

fn save_engine(db: &Database, engine: &FocusTimer) -> CliResult {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    db.kv_set(SAVED_AT_KEY, &Utc::now().to_rfc3339())?;
    Ok(())
}

/// Replay the wall-clock seconds that passed since the engine was last
/// saved. Returns the completion event if the countdown finished while
/// nobody was watching.
fn catch_up(db: &Database, engine: &mut FocusTimer) -> Option<Event> {
    if engine.state() != TimerState::Running {
        return None;
    }
    let saved_at = db
        .kv_get(SAVED_AT_KEY)
        .ok()
        .flatten()
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|t| t.with_timezone(&Utc))?;
    let elapsed = (Utc::now() - saved_at).num_seconds().max(0) as u32;
    engine.advance_by(elapsed)
}

/// Route a completion event through the facade: end the active session
/// and run the accounting chain.
fn handle_completion(game: &mut Gamification<Database>, event: &Event) -> CliResult {
    let Event::TimerCompleted {
        elapsed_minutes, ..
    } = event
    else {
        return Ok(());
    };
    match game.active_session()? {
        Some(session) => {
            let events = game.complete_session(session.id, *elapsed_minutes, Utc::now())?;
            print_events(&events);
        }
        None => {
            println!("Countdown finished ({elapsed_minutes} min) with no session on record.");
        }
    }
    Ok(())
}

pub fn run(action: TimerAction) -> CliResult {
    let mut game = load_game()?;
    let mut engine = load_engine(game.store());
    if let Some(event) = catch_up(game.store(), &mut engine) {
        handle_completion(&mut game, &event)?;
        save_engine(game.store(), &engine)?;
    }

    match action {
        TimerAction::Start { minutes, club } => {
            if let Some(minutes) = minutes {
                engine.select_preset(Preset { minutes });
            }
            match engine.start() {
                Some(_) => {
                    if game.active_session()?.is_none() {
                        game.start_session(club, Utc::now())?;
                    }
                    save_engine(game.store(), &engine)?;
                    println!("Timer started: {} remaining", clock(engine.remaining_seconds()));
                }
                None => println!("Nothing to start."),
            }
        }
        TimerAction::Pause => match engine.pause() {
            Some(_) => {
                save_engine(game.store(), &engine)?;
                println!("Paused at {} remaining", clock(engine.remaining_seconds()));
            }
            None => println!("Timer is not running."),
        },
        TimerAction::Resume => match engine.start() {
            Some(_) => {
                save_engine(game.store(), &engine)?;
                println!("Resumed: {} remaining", clock(engine.remaining_seconds()));
            }
            None => println!("Nothing to resume."),
        },
        TimerAction::Finish => {
            match engine.finish_early() {
                Some(event) => handle_completion(&mut game, &event)?,
                None => println!("Nothing to record."),
            }
            save_engine(game.store(), &engine)?;
        }
        TimerAction::Reset => {
            engine.reset();
            save_engine(game.store(), &engine)?;
            println!("Timer reset: {} ready", clock(engine.total_seconds()));
        }
        TimerAction::Preset { minutes } => match engine.select_preset(Preset { minutes }) {
            Some(_) => {
                save_engine(game.store(), &engine)?;
                println!("Preset: {minutes} minutes");
            }
            None => println!("Presets only apply while the timer is idle."),
        },
        TimerAction::Watch => {
            if engine.state() != TimerState::Running {
                if engine.start().is_none() {
                    println!("Nothing to watch -- start or reset the timer first.");
                    return Ok(());
                }
                if game.active_session()?.is_none() {
                    game.start_session(None, Utc::now())?;
                }
                save_engine(game.store(), &engine)?;
            }
            loop {
                std::thread::sleep(std::time::Duration::from_secs(1));
                let completion = engine.tick();
                print!(
                    "\r{} {}  ",
                    clock(engine.remaining_seconds()),
                    progress_bar(engine.progress_pct(), 20)
                );
                std::io::stdout().flush()?;
                if let Some(event) = completion {
                    println!();
                    handle_completion(&mut game, &event)?;
                    save_engine(game.store(), &engine)?;
                    break;
                }
            }
        }
        TimerAction::Status { json } => {
            if json {
                println!("{}", serde_json::to_string(&engine.snapshot())?);
            } else {
                let state = match engine.state() {
                    TimerState::Idle => "idle",
                    TimerState::Running => "running",
                    TimerState::Paused => "paused",
                    TimerState::Completed => "completed",
                };
                println!(
                    "{state}: {} / {}  {}",
                    clock(engine.remaining_seconds()),
                    clock(engine.total_seconds()),
                    progress_bar(engine.progress_pct(), 20)
                );
            }
            // Status observed mid-countdown persists the caught-up state.
            save_engine(game.store(), &engine)?;
        }
    }
    Ok(())
}
