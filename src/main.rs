use std::time::SystemTime;

use anyhow::{Context, Result, anyhow};

use courtside::config::Config;
use courtside::model::PositionTable;
use courtside::query_cache::QueryCache;
use courtside::report::{ReportInputs, build_reports, render_team_report};
use courtside::snapshot;

fn main() -> Result<()> {
    env_logger::init();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = Config::load(&args)?;

    let data = snapshot::load_snapshot(&cfg.snapshot_path)
        .context("unable to load season snapshot")?;
    log::info!(
        "loaded {} games, {} stat rows, {} score rows from {}",
        data.games.len(),
        data.stats.len(),
        data.scores.len(),
        cfg.snapshot_path.display()
    );

    let teams = match cfg.team_id {
        Some(team) => {
            let club = data.team(team).map(|t| t.club_id).unwrap_or(cfg.club_id);
            vec![(team, club)]
        }
        None => data
            .teams
            .iter()
            .filter(|t| cfg.club_id == 0 || t.club_id == cfg.club_id)
            .map(|t| (t.id, t.club_id))
            .collect(),
    };
    if teams.is_empty() {
        return Err(anyhow!("no teams to report on"));
    }

    let inputs = ReportInputs::new(&data, PositionTable::standard());
    let mut cache = QueryCache::new(cfg.cache_ttl);
    let reports = build_reports(
        &inputs,
        &teams,
        cfg.report_threads,
        &mut cache,
        SystemTime::now(),
    );

    for report in &reports {
        println!("{}", render_team_report(report));
    }
    Ok(())
}
