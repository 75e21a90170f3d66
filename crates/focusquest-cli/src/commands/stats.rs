use clap::Subcommand;

use focusquest_core::stats;

use super::common::{load_game, progress_bar, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions, minutes, and goal progress
    Today,
    /// The trailing seven-day series
    Week {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Lifetime totals
    All,
}

pub fn run(action: StatsAction) -> CliResult {
    let game = load_game()?;
    match action {
        StatsAction::Today => {
            let today = game.today_minutes();
            let goal = game.goal_progress();
            let date = chrono::Utc::now().date_naive();
            let sessions_today = game
                .recent_sessions()
                .iter()
                .filter(|s| focusquest_core::dates::day_of(s.started_at) == date)
                .count();
            println!("Sessions: {sessions_today}");
            println!(
                "Focused:  {today}m / {}m  {}",
                game.profile().daily_goal_minutes,
                progress_bar(goal.percent, 20)
            );
            if goal.complete {
                println!("Goal complete! +{} bonus minutes today", goal.bonus);
            } else {
                println!("{} minutes to go", goal.remaining);
            }
        }
        StatsAction::Week { json } => {
            let week = game.week();
            if json {
                println!("{}", serde_json::to_string(week)?);
                return Ok(());
            }
            let goal = game.profile().daily_goal_minutes;
            for stat in week {
                let met = if stat.minutes >= goal { "*" } else { " " };
                println!("{}  {:>4}m {met}", stat.date.format("%a %Y-%m-%d"), stat.minutes);
            }
            let total = stats::week_total(week);
            println!(
                "total {}h {}m, avg {}m/day",
                total / 60,
                total % 60,
                stats::week_average(week)
            );
        }
        StatsAction::All => {
            let profile = game.profile();
            let xp = game.xp();
            let streak = game.streak();
            let total = profile.total_focus_minutes;
            println!("Total focus: {}h {}m", total / 60, total % 60);
            println!(
                "Level {} ({}) -- {}/{} XP",
                xp.current_level,
                xp.title(),
                xp.total_xp,
                xp.xp_to_next_level
            );
            println!(
                "Streak: {} day(s), longest {}",
                streak.current_streak, streak.longest_streak
            );
        }
    }
    Ok(())
}
