use focusquest_core::InsightKind;

use super::common::{load_game, CliResult};

pub fn run() -> CliResult {
    let game = load_game()?;
    let insights = game.insights();
    if insights.is_empty() {
        println!("No insights yet -- log a session first.");
        return Ok(());
    }
    for insight in insights {
        let tag = match insight.kind {
            InsightKind::Positive => "+",
            InsightKind::Encouraging => ">",
            InsightKind::Milestone => "*",
        };
        println!("{tag} {}", insight.message);
    }
    Ok(())
}
