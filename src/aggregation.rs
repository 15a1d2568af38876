use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{ClubId, Game, GameId, GameStatus, PositionGroup, PositionTable, Quarter, TeamId};
use crate::score_store::ScoreRecord;
use crate::stat_store::StatRecord;

/// Goals credited to the winning side of a forfeit, all in the first quarter.
pub const FORFEIT_GOALS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    pub quarter: Quarter,
    pub team_score: u32,
    pub opponent_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    fn from_scores(team: u32, opponent: u32) -> Self {
        match team.cmp(&opponent) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Loss => 'L',
            Outcome::Draw => 'D',
        }
    }
}

// Forfeit labels are written from the home side.
fn forfeit_outcome(game: &Game, team: TeamId) -> Option<Outcome> {
    let home_won = match game.status {
        GameStatus::ForfeitWin => true,
        GameStatus::ForfeitLoss => false,
        _ => return None,
    };
    let won = home_won != game.is_away_team(team);
    Some(if won { Outcome::Win } else { Outcome::Loss })
}

/// Per-quarter score for `team` in `game`.
///
/// Forfeits never read records: the winner gets `FORFEIT_GOALS` in Q1 and the
/// rest is 0-0. Otherwise each side of each quarter comes from the official
/// score row when one exists, else from the team's own stat rows (goals for
/// at attack positions, goals against at defence positions). Rows for other
/// games are ignored.
pub fn compute_quarter_scores(
    game: &Game,
    team: TeamId,
    scores: &[ScoreRecord],
    stats: &[StatRecord],
    table: &PositionTable,
) -> [QuarterScore; 4] {
    let mut out = Quarter::ALL.map(|quarter| QuarterScore {
        quarter,
        team_score: 0,
        opponent_score: 0,
    });

    if let Some(outcome) = forfeit_outcome(game, team) {
        log::debug!("game {} is a forfeit, quarter scores fixed", game.id);
        match outcome {
            Outcome::Win => out[0].team_score = FORFEIT_GOALS,
            _ => out[0].opponent_score = FORFEIT_GOALS,
        }
        return out;
    }

    let mut official_for: [Option<u32>; 4] = [None; 4];
    let mut official_against: [Option<u32>; 4] = [None; 4];
    for r in scores.iter().filter(|r| r.game_id == game.id) {
        let slot = if r.team_id == team {
            &mut official_for[r.quarter.index()]
        } else {
            &mut official_against[r.quarter.index()]
        };
        *slot = Some(slot.unwrap_or(0).saturating_add(r.score));
    }

    let mut stat_for = [0u32; 4];
    let mut stat_against = [0u32; 4];
    for r in stats
        .iter()
        .filter(|r| r.game_id == game.id && r.team_id == team)
    {
        let view = r.position_stats(table);
        let q = r.quarter.index();
        match table.group(r.position) {
            PositionGroup::Attack => stat_for[q] = stat_for[q].saturating_add(view.goals_for()),
            PositionGroup::Defense => {
                stat_against[q] = stat_against[q].saturating_add(view.goals_against())
            }
            PositionGroup::Mid => {}
        }
    }

    for (i, qs) in out.iter_mut().enumerate() {
        qs.team_score = official_for[i].unwrap_or(stat_for[i]);
        qs.opponent_score = official_against[i].unwrap_or(stat_against[i]);
    }
    out
}

pub fn game_totals(quarters: &[QuarterScore]) -> (u32, u32) {
    quarters.iter().fold((0, 0), |(f, a), q| {
        (
            f.saturating_add(q.team_score),
            a.saturating_add(q.opponent_score),
        )
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub total_goals_for: u32,
    pub total_goals_against: u32,
    pub games_with_stats: u32,
    pub avg_for: f64,
    pub avg_against: f64,
}

/// Goals for and against across completed games with statistics enabled,
/// from official score rows only.
pub fn compute_season_totals(
    games: &[Game],
    scores_by_game: &HashMap<GameId, Vec<ScoreRecord>>,
    team: TeamId,
) -> SeasonTotals {
    let mut out = SeasonTotals::default();
    for game in games
        .iter()
        .filter(|g| g.counts_for_season() && g.involves(team))
    {
        let Some(rows) = scores_by_game.get(&game.id) else {
            continue;
        };
        if rows.is_empty() {
            continue;
        }
        out.games_with_stats += 1;
        for r in rows {
            if r.team_id == team {
                out.total_goals_for = out.total_goals_for.saturating_add(r.score);
            } else {
                out.total_goals_against = out.total_goals_against.saturating_add(r.score);
            }
        }
    }

    if out.games_with_stats > 0 {
        let n = out.games_with_stats as f64;
        out.avg_for = out.total_goals_for as f64 / n;
        out.avg_against = out.total_goals_against as f64 / n;
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRate {
    pub club_id: ClubId,
    pub team_id: TeamId,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    // Completed games with neither score nor stat rows yet. Also tallied as draws.
    pub without_records: u32,
}

impl WinRate {
    pub fn played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn win_percentage(&self) -> f64 {
        let played = self.played();
        if played == 0 {
            return 0.0;
        }
        self.wins as f64 / played as f64 * 100.0
    }
}

/// Result of one game for `team`, or `None` when the game has no result to
/// count (not finished or stats disabled). A completed game with nothing
/// recorded is a 0-0 draw.
pub fn game_outcome(
    game: &Game,
    team: TeamId,
    scores: &[ScoreRecord],
    stats: &[StatRecord],
    table: &PositionTable,
) -> Option<Outcome> {
    if !game.involves(team) || !game.allows_statistics() {
        return None;
    }
    if let Some(outcome) = forfeit_outcome(game, team) {
        return Some(outcome);
    }
    if game.status != GameStatus::Completed {
        return None;
    }
    let (team_total, opponent_total) =
        game_totals(&compute_quarter_scores(game, team, scores, stats, table));
    Some(Outcome::from_scores(team_total, opponent_total))
}

/// Win/loss/draw tally. Forfeits count by label whatever the recorded scores.
pub fn compute_win_rate(
    games: &[Game],
    team: TeamId,
    club: ClubId,
    scores_by_game: &HashMap<GameId, Vec<ScoreRecord>>,
    stats_by_game: &HashMap<GameId, Vec<StatRecord>>,
    table: &PositionTable,
) -> WinRate {
    let mut out = WinRate {
        club_id: club,
        team_id: team,
        ..WinRate::default()
    };
    for game in games {
        if !game.involves(team) || !game.allows_statistics() {
            continue;
        }
        if game.status != GameStatus::Completed && !game.status.is_forfeit() {
            continue;
        }
        let scores = rows_for(scores_by_game, game.id);
        let stats = rows_for(stats_by_game, game.id);
        if game.status == GameStatus::Completed && !has_records(game, team, scores, stats) {
            out.without_records += 1;
        }
        match game_outcome(game, team, scores, stats, table) {
            Some(Outcome::Win) => out.wins += 1,
            Some(Outcome::Loss) => out.losses += 1,
            Some(Outcome::Draw) => out.draws += 1,
            None => {}
        }
    }
    out
}

fn has_records(game: &Game, team: TeamId, scores: &[ScoreRecord], stats: &[StatRecord]) -> bool {
    scores.iter().any(|r| r.game_id == game.id)
        || stats
            .iter()
            .any(|r| r.game_id == game.id && r.team_id == team)
}

/// Earlier completed meetings between `team` and `opponent`, oldest first.
pub fn filter_historical_opponent_games<'a>(
    all_games: &'a [Game],
    team: TeamId,
    opponent: TeamId,
    exclude_game: Option<GameId>,
) -> Vec<&'a Game> {
    let mut out: Vec<&Game> = all_games
        .iter()
        .filter(|g| g.counts_for_season())
        .filter(|g| Some(g.id) != exclude_game)
        .filter(|g| g.opponent_of(team) == Some(opponent))
        .collect();
    out.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadGame {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub round: u32,
    pub quarters: [QuarterScore; 4],
    pub goals_for: u32,
    pub goals_against: u32,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentHistory {
    pub team_id: TeamId,
    pub opponent_id: TeamId,
    pub games: Vec<HeadToHeadGame>,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub avg_margin: f64,
}

pub fn compute_opponent_history(
    all_games: &[Game],
    team: TeamId,
    opponent: TeamId,
    exclude_game: Option<GameId>,
    scores_by_game: &HashMap<GameId, Vec<ScoreRecord>>,
    stats_by_game: &HashMap<GameId, Vec<StatRecord>>,
    table: &PositionTable,
) -> OpponentHistory {
    let mut out = OpponentHistory {
        team_id: team,
        opponent_id: opponent,
        games: Vec::new(),
        wins: 0,
        losses: 0,
        draws: 0,
        avg_margin: 0.0,
    };

    let mut margin_sum = 0i64;
    for game in filter_historical_opponent_games(all_games, team, opponent, exclude_game) {
        let scores = rows_for(scores_by_game, game.id);
        let stats = rows_for(stats_by_game, game.id);
        let quarters = compute_quarter_scores(game, team, scores, stats, table);
        let (goals_for, goals_against) = game_totals(&quarters);
        let outcome = game_outcome(game, team, scores, stats, table);
        match outcome {
            Some(Outcome::Win) => out.wins += 1,
            Some(Outcome::Loss) => out.losses += 1,
            Some(Outcome::Draw) => out.draws += 1,
            None => {}
        }
        if outcome.is_some() {
            margin_sum += i64::from(goals_for) - i64::from(goals_against);
        }
        out.games.push(HeadToHeadGame {
            game_id: game.id,
            date: game.date,
            round: game.round,
            quarters,
            goals_for,
            goals_against,
            outcome,
        });
    }

    let counted = out.wins + out.losses + out.draws;
    if counted > 0 {
        out.avg_margin = margin_sum as f64 / counted as f64;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterAverage {
    pub quarter: Quarter,
    pub avg_for: f64,
    pub avg_against: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterAverages {
    pub games_counted: u32,
    pub quarters: [QuarterAverage; 4],
}

/// Average score per quarter over completed games that have any rows for
/// `team`.
pub fn compute_quarter_averages(
    games: &[Game],
    scores_by_game: &HashMap<GameId, Vec<ScoreRecord>>,
    stats_by_game: &HashMap<GameId, Vec<StatRecord>>,
    team: TeamId,
    table: &PositionTable,
) -> QuarterAverages {
    let mut sums = [(0u64, 0u64); 4];
    let mut games_counted = 0u32;
    for game in games
        .iter()
        .filter(|g| g.counts_for_season() && g.involves(team))
    {
        let scores = rows_for(scores_by_game, game.id);
        let stats = rows_for(stats_by_game, game.id);
        let has_rows = !scores.is_empty() || stats.iter().any(|r| r.team_id == team);
        if !has_rows {
            continue;
        }
        games_counted += 1;
        for q in compute_quarter_scores(game, team, scores, stats, table) {
            let slot = &mut sums[q.quarter.index()];
            slot.0 += u64::from(q.team_score);
            slot.1 += u64::from(q.opponent_score);
        }
    }

    let quarters = Quarter::ALL.map(|quarter| {
        let (f, a) = sums[quarter.index()];
        let (avg_for, avg_against) = if games_counted > 0 {
            let n = games_counted as f64;
            (f as f64 / n, a as f64 / n)
        } else {
            (0.0, 0.0)
        };
        QuarterAverage {
            quarter,
            avg_for,
            avg_against,
        }
    });
    QuarterAverages {
        games_counted,
        quarters,
    }
}

pub(crate) fn rows_for<T>(by_game: &HashMap<GameId, Vec<T>>, game: GameId) -> &[T] {
    by_game.get(&game).map(Vec::as_slice).unwrap_or(&[])
}
