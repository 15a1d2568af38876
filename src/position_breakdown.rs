use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Game, GameId, Position, PositionTable, TeamId};
use crate::stat_store::StatRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionTotal {
    pub position: Position,
    pub total: u32,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSplit {
    /// Sum of the two positions' per-game averages.
    pub performance: f64,
    pub members: [PositionTotal; 2],
    /// Each member's share of the unit total, in percent.
    pub split: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionBreakdown {
    pub games_with_position_stats: u32,
    pub attack: UnitSplit,
    pub defense: UnitSplit,
}

impl PositionBreakdown {
    pub fn total(&self, position: Position) -> Option<&PositionTotal> {
        self.attack
            .members
            .iter()
            .chain(self.defense.members.iter())
            .find(|t| t.position == position)
    }
}

/// Goals scored by the shooters (GS, GA) and conceded by the keepers (GD, GK)
/// over completed games with statistics enabled.
pub fn compute_position_breakdown(
    games: &[Game],
    stats_by_game: &HashMap<GameId, Vec<StatRecord>>,
    team: TeamId,
    table: &PositionTable,
) -> PositionBreakdown {
    let attack = table.attack_unit();
    let defense = table.defense_unit();
    let mut totals: HashMap<Position, u32> = HashMap::new();
    let mut contributing: HashSet<GameId> = HashSet::new();

    for game in games.iter().filter(|g| g.counts_for_season()) {
        let Some(rows) = stats_by_game.get(&game.id) else {
            continue;
        };
        for r in rows.iter().filter(|r| r.team_id == team) {
            let view = r.position_stats(table);
            let value = if attack.contains(&r.position) {
                view.goals_for()
            } else if defense.contains(&r.position) {
                view.goals_against()
            } else {
                continue;
            };
            contributing.insert(game.id);
            let total = totals.entry(r.position).or_insert(0);
            *total = total.saturating_add(value);
        }
    }

    let games_with_position_stats = contributing.len() as u32;
    let member = |position: Position| {
        let total = totals.get(&position).copied().unwrap_or(0);
        let average = if games_with_position_stats > 0 {
            total as f64 / games_with_position_stats as f64
        } else {
            0.0
        };
        PositionTotal {
            position,
            total,
            average,
        }
    };

    PositionBreakdown {
        games_with_position_stats,
        attack: unit_split([member(attack[0]), member(attack[1])]),
        defense: unit_split([member(defense[0]), member(defense[1])]),
    }
}

// A unit with nothing recorded splits 50/50.
fn unit_split(members: [PositionTotal; 2]) -> UnitSplit {
    let unit_total = members[0].total.saturating_add(members[1].total);
    let split = if unit_total == 0 {
        [50.0, 50.0]
    } else {
        [
            members[0].total as f64 / unit_total as f64 * 100.0,
            members[1].total as f64 / unit_total as f64 * 100.0,
        ]
    };
    UnitSplit {
        performance: members[0].average + members[1].average,
        members,
        split,
    }
}
