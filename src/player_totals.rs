use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::counters::{AttackStats, Counters, PositionStats};
use crate::model::{Game, GameId, PlayerId, PositionGroup, PositionTable, TeamId};
use crate::stat_store::StatRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub player_id: PlayerId,
    pub games: u32,
    pub quarters: u32,
    pub attack_quarters: u32,
    pub mid_quarters: u32,
    pub defense_quarters: u32,
    /// Goals scored while at an attack position.
    pub goals_for: u32,
    pub missed_goals: u32,
    /// Goals conceded while at a defence position.
    pub goals_against: u32,
    /// Counters every position records, summed across all positions played.
    pub general: Counters,
}

impl PlayerTotals {
    pub fn shooting_pct(&self) -> Option<f64> {
        AttackStats {
            goals_for: self.goals_for,
            missed_goals: self.missed_goals,
            rebounds: 0,
            general: Default::default(),
        }
        .shooting_pct()
    }
}

/// Season counters per player for `team`, sorted by player id. Goal counters
/// only accumulate from the positions where they mean something.
pub fn compute_player_totals(
    games: &[Game],
    stats_by_game: &HashMap<GameId, Vec<StatRecord>>,
    team: TeamId,
    table: &PositionTable,
) -> Vec<PlayerTotals> {
    let mut by_player: BTreeMap<PlayerId, PlayerTotals> = BTreeMap::new();
    let mut seen_games: HashSet<(PlayerId, GameId)> = HashSet::new();

    for game in games.iter().filter(|g| g.counts_for_season()) {
        let Some(rows) = stats_by_game.get(&game.id) else {
            continue;
        };
        for r in rows.iter().filter(|r| r.team_id == team) {
            let entry = by_player.entry(r.player_id).or_insert_with(|| PlayerTotals {
                player_id: r.player_id,
                ..PlayerTotals::default()
            });
            if seen_games.insert((r.player_id, game.id)) {
                entry.games += 1;
            }
            entry.quarters += 1;
            match table.group(r.position) {
                PositionGroup::Attack => entry.attack_quarters += 1,
                PositionGroup::Mid => entry.mid_quarters += 1,
                PositionGroup::Defense => entry.defense_quarters += 1,
            }

            let view = r.position_stats(table);
            entry.goals_for = entry.goals_for.saturating_add(view.goals_for());
            entry.goals_against = entry.goals_against.saturating_add(view.goals_against());
            let rebounds = match view {
                PositionStats::Attack(a) => {
                    entry.missed_goals = entry.missed_goals.saturating_add(a.missed_goals);
                    a.rebounds
                }
                PositionStats::Defense(d) => d.rebounds,
                PositionStats::Mid(_) => 0,
            };
            let general = view.general();
            entry.general.add(&Counters {
                rebounds,
                intercepts: general.intercepts,
                bad_pass: general.bad_pass,
                handling_error: general.handling_error,
                pick_up: general.pick_up,
                infringement: general.infringement,
                ..Counters::default()
            });
        }
    }

    by_player.into_values().collect()
}
