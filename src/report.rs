use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::SystemTime;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregation::{
    QuarterAverages, SeasonTotals, WinRate, compute_quarter_averages, compute_season_totals,
    compute_win_rate,
};
use crate::model::{ClubId, GameId, PositionTable, TeamId};
use crate::player_totals::{PlayerTotals, compute_player_totals};
use crate::position_breakdown::{PositionBreakdown, compute_position_breakdown};
use crate::query_cache::{CacheKey, QueryCache, ResourceKind};
use crate::score_store::ScoreRecord;
use crate::snapshot::Dataset;
use crate::stat_store::StatRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team_id: TeamId,
    pub team_name: String,
    pub season: SeasonTotals,
    pub record: WinRate,
    pub positions: PositionBreakdown,
    pub quarters: QuarterAverages,
    pub players: Vec<PlayerTotals>,
}

/// Grouped record snapshot shared by every report built from one dataset.
pub struct ReportInputs<'a> {
    pub data: &'a Dataset,
    pub scores_by_game: HashMap<GameId, Vec<ScoreRecord>>,
    pub stats_by_game: HashMap<GameId, Vec<StatRecord>>,
    pub table: PositionTable,
}

impl<'a> ReportInputs<'a> {
    pub fn new(data: &'a Dataset, table: PositionTable) -> Self {
        Self {
            data,
            scores_by_game: data.scores_by_game(),
            stats_by_game: data.stats_by_game(),
            table,
        }
    }
}

pub fn build_team_report(inputs: &ReportInputs<'_>, team: TeamId, club: ClubId) -> TeamReport {
    let games = &inputs.data.games;
    let team_name = inputs
        .data
        .team(team)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("Team {team}"));
    TeamReport {
        team_id: team,
        team_name,
        season: compute_season_totals(games, &inputs.scores_by_game, team),
        record: compute_win_rate(
            games,
            team,
            club,
            &inputs.scores_by_game,
            &inputs.stats_by_game,
            &inputs.table,
        ),
        positions: compute_position_breakdown(games, &inputs.stats_by_game, team, &inputs.table),
        quarters: compute_quarter_averages(
            games,
            &inputs.scores_by_game,
            &inputs.stats_by_game,
            team,
            &inputs.table,
        ),
        players: compute_player_totals(games, &inputs.stats_by_game, team, &inputs.table),
    }
}

/// Reports for several teams on a bounded pool, in the order given. Fresh
/// entries in `cache` are reused; new reports are stored back.
pub fn build_reports(
    inputs: &ReportInputs<'_>,
    teams: &[(TeamId, ClubId)],
    threads: usize,
    cache: &mut QueryCache<TeamReport>,
    now: SystemTime,
) -> Vec<TeamReport> {
    let key = |team: TeamId, club: ClubId| {
        CacheKey::with_params(ResourceKind::Report, team, format!("club={club}"))
    };
    let missing: Vec<(TeamId, ClubId)> = teams
        .iter()
        .copied()
        .filter(|(team, club)| cache.get(&key(*team, *club), now).is_none())
        .collect();

    let built: Vec<TeamReport> = with_report_pool(threads, || {
        missing
            .par_iter()
            .map(|(team, club)| build_team_report(inputs, *team, *club))
            .collect()
    });
    for (report, (team, club)) in built.into_iter().zip(missing.iter()) {
        cache.insert(key(*team, *club), report, now);
    }

    teams
        .iter()
        .filter_map(|(team, club)| cache.get(&key(*team, *club), now))
        .collect()
}

fn with_report_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(err) => {
            log::warn!("report pool unavailable ({err}), running inline");
            action()
        }
    }
}

pub fn render_team_report(report: &TeamReport) -> String {
    let mut out = String::new();
    let s = &report.season;
    let r = &report.record;
    let _ = writeln!(out, "== {} (#{})", report.team_name, report.team_id);
    let _ = writeln!(
        out,
        "Record: W{} L{} D{} ({:.1}% wins){}",
        r.wins,
        r.losses,
        r.draws,
        r.win_percentage(),
        if r.without_records > 0 {
            format!(", {} draws with nothing recorded", r.without_records)
        } else {
            String::new()
        }
    );
    let _ = writeln!(
        out,
        "Goals: {} for / {} against over {} games (avg {:.1} / {:.1})",
        s.total_goals_for, s.total_goals_against, s.games_with_stats, s.avg_for, s.avg_against
    );

    let _ = writeln!(out, "Quarters ({} games):", report.quarters.games_counted);
    for q in &report.quarters.quarters {
        let _ = writeln!(
            out,
            "  {}  {:>5.1} - {:<5.1}",
            q.quarter, q.avg_for, q.avg_against
        );
    }

    let p = &report.positions;
    let _ = writeln!(
        out,
        "Attack unit {:.1}/game: {} {:.0}% / {} {:.0}%",
        p.attack.performance,
        p.attack.members[0].position,
        p.attack.split[0],
        p.attack.members[1].position,
        p.attack.split[1]
    );
    let _ = writeln!(
        out,
        "Defense unit {:.1}/game: {} {:.0}% / {} {:.0}%",
        p.defense.performance,
        p.defense.members[0].position,
        p.defense.split[0],
        p.defense.members[1].position,
        p.defense.split[1]
    );

    if !report.players.is_empty() {
        let _ = writeln!(out, "Players:");
        for pt in &report.players {
            let shooting = pt
                .shooting_pct()
                .map(|v| format!("{v:.0}%"))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "  #{:<6} games {:>2} qtrs {:>3}  G {:>3} ({shooting})  GA {:>3}  int {:>3}  reb {:>3}",
                pt.player_id,
                pt.games,
                pt.quarters,
                pt.goals_for,
                pt.goals_against,
                pt.general.intercepts,
                pt.general.rebounds
            );
        }
    }
    out
}
