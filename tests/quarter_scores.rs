use chrono::NaiveDate;

use courtside::aggregation::{compute_quarter_scores, game_totals};
use courtside::counters::Counters;
use courtside::model::{Game, GameStatus, Position, PositionTable, Quarter};
use courtside::score_store::ScoreRecord;
use courtside::stat_store::StatRecord;

const TEAM_A: u64 = 1;
const TEAM_B: u64 = 2;

fn game(status: GameStatus) -> Game {
    Game {
        id: 1,
        home_team_id: TEAM_A,
        away_team_id: Some(TEAM_B),
        date: NaiveDate::from_ymd_opt(2026, 5, 2).expect("valid date"),
        round: 3,
        status,
        allows_statistics: None,
    }
}

fn q(n: u8) -> Quarter {
    Quarter::new(n).expect("quarter in range")
}

fn score(team: u64, quarter: u8, score: u32) -> ScoreRecord {
    ScoreRecord {
        game_id: 1,
        team_id: team,
        quarter: q(quarter),
        score,
    }
}

fn stat(player: u64, quarter: u8, position: Position, counters: Counters) -> StatRecord {
    StatRecord {
        game_id: 1,
        team_id: TEAM_A,
        player_id: player,
        quarter: q(quarter),
        position,
        counters,
    }
}

fn pairs(game: &Game, team: u64, scores: &[ScoreRecord], stats: &[StatRecord]) -> Vec<(u32, u32)> {
    compute_quarter_scores(game, team, scores, stats, &PositionTable::standard())
        .iter()
        .map(|qs| (qs.team_score, qs.opponent_score))
        .collect()
}

#[test]
fn official_scores_fill_recorded_quarters_only() {
    let scores = vec![
        score(TEAM_A, 1, 12),
        score(TEAM_A, 2, 8),
        score(TEAM_B, 1, 8),
        score(TEAM_B, 2, 12),
    ];
    let g = game(GameStatus::Completed);
    assert_eq!(
        pairs(&g, TEAM_A, &scores, &[]),
        vec![(12, 8), (8, 12), (0, 0), (0, 0)]
    );
    let out = compute_quarter_scores(&g, TEAM_A, &scores, &[], &PositionTable::standard());
    assert_eq!(out[2].quarter, q(3));
    assert_eq!(game_totals(&out), (20, 20));
}

#[test]
fn forfeit_win_ignores_every_record() {
    let scores = vec![score(TEAM_A, 1, 3), score(TEAM_B, 1, 30)];
    let stats = vec![stat(
        7,
        2,
        Position::GS,
        Counters {
            goals_for: 9,
            ..Counters::default()
        },
    )];
    let g = game(GameStatus::ForfeitWin);
    assert_eq!(
        pairs(&g, TEAM_A, &scores, &stats),
        vec![(10, 0), (0, 0), (0, 0), (0, 0)]
    );
}

#[test]
fn forfeit_loss_is_the_mirror() {
    let g = game(GameStatus::ForfeitLoss);
    assert_eq!(
        pairs(&g, TEAM_A, &[score(TEAM_A, 1, 40)], &[]),
        vec![(0, 10), (0, 0), (0, 0), (0, 0)]
    );
}

#[test]
fn forfeit_label_is_read_from_the_home_side() {
    let g = game(GameStatus::ForfeitWin);
    assert_eq!(
        pairs(&g, TEAM_B, &[], &[]),
        vec![(0, 10), (0, 0), (0, 0), (0, 0)]
    );
}

#[test]
fn forfeit_loss_read_from_the_away_side_is_a_win() {
    let g = game(GameStatus::ForfeitLoss);
    assert_eq!(
        pairs(&g, TEAM_B, &[score(TEAM_B, 1, 2), score(TEAM_A, 1, 25)], &[]),
        vec![(10, 0), (0, 0), (0, 0), (0, 0)]
    );
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let g = game(GameStatus::Completed);
    let scores = vec![score(TEAM_A, 1, u32::MAX), score(TEAM_A, 2, 1), score(TEAM_B, 1, 3)];
    let out = compute_quarter_scores(&g, TEAM_A, &scores, &[], &PositionTable::standard());
    assert_eq!(game_totals(&out), (u32::MAX, 3));
}

#[test]
fn stat_rows_fill_in_when_no_score_row_exists() {
    let stats = vec![
        stat(
            11,
            3,
            Position::GS,
            Counters {
                goals_for: 5,
                // goals against recorded against a shooter is not a defensive figure
                goals_against: 4,
                ..Counters::default()
            },
        ),
        stat(
            12,
            3,
            Position::GA,
            Counters {
                goals_for: 2,
                ..Counters::default()
            },
        ),
        stat(
            13,
            3,
            Position::GK,
            Counters {
                goals_against: 6,
                goals_for: 1,
                ..Counters::default()
            },
        ),
        stat(
            14,
            3,
            Position::C,
            Counters {
                goals_for: 3,
                ..Counters::default()
            },
        ),
    ];
    let scores = vec![score(TEAM_A, 1, 10), score(TEAM_B, 1, 9)];
    let g = game(GameStatus::Completed);
    assert_eq!(
        pairs(&g, TEAM_A, &scores, &stats),
        vec![(10, 9), (0, 0), (7, 6), (0, 0)]
    );
}

#[test]
fn official_row_wins_over_stats_per_side() {
    let stats = vec![
        stat(
            11,
            1,
            Position::GS,
            Counters {
                goals_for: 5,
                ..Counters::default()
            },
        ),
        stat(
            13,
            1,
            Position::GD,
            Counters {
                goals_against: 4,
                ..Counters::default()
            },
        ),
    ];
    // Only our side has an official row: the opponent still comes from stats.
    let scores = vec![score(TEAM_A, 1, 11)];
    let g = game(GameStatus::Completed);
    assert_eq!(pairs(&g, TEAM_A, &scores, &stats)[0], (11, 4));
}

#[test]
fn rows_from_other_games_are_ignored() {
    let mut other = score(TEAM_A, 1, 25);
    other.game_id = 99;
    let g = game(GameStatus::Completed);
    assert_eq!(pairs(&g, TEAM_A, &[other], &[])[0], (0, 0));
}
