use anyhow::{Context, Result};

use courtside::aggregation::compute_opponent_history;
use courtside::config::Config;
use courtside::model::PositionTable;
use courtside::snapshot;

fn main() -> Result<()> {
    env_logger::init();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = Config::load(&args)?;
    let team = cfg.team_id.context("--team (or COURTSIDE_TEAM_ID) is required")?;
    let opponent = cfg.opponent_id.context("--opponent is required")?;

    let data = snapshot::load_snapshot(&cfg.snapshot_path)?;
    let table = PositionTable::standard();
    let history = compute_opponent_history(
        &data.games,
        team,
        opponent,
        cfg.exclude_game,
        &data.scores_by_game(),
        &data.stats_by_game(),
        &table,
    );

    let name = |id| {
        data.team(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("Team {id}"))
    };
    println!("{} vs {}", name(team), name(opponent));
    if history.games.is_empty() {
        println!("No previous completed games.");
        return Ok(());
    }

    for g in &history.games {
        let quarters = g
            .quarters
            .iter()
            .map(|q| format!("{}-{}", q.team_score, q.opponent_score))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{} R{:<2} {:>3}-{:<3} {}  [{}]",
            g.date,
            g.round,
            g.goals_for,
            g.goals_against,
            g.outcome.map(|o| o.letter()).unwrap_or('-'),
            quarters
        );
    }
    println!(
        "Record W{} L{} D{}, average margin {:+.1}",
        history.wins, history.losses, history.draws, history.avg_margin
    );
    Ok(())
}
