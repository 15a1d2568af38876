use std::collections::HashMap;

use crate::lineup::LineupAssignment;
use crate::model::{GameId, PlayerId, Position, PositionTable, Quarter, RosterEntry, TeamId};

type RosterKey = (GameId, TeamId, Quarter, Position);

/// Quarter-by-quarter court assignments, one row per
/// (game, team, quarter, position).
#[derive(Debug, Clone, Default)]
pub struct RosterTable {
    entries: HashMap<RosterKey, Option<PlayerId>>,
}

impl RosterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = RosterEntry>) -> Self {
        let mut table = Self::new();
        for e in entries {
            let key = (e.game_id, e.team_id, e.quarter, e.position);
            if table.entries.insert(key, e.player_id).is_some() {
                log::warn!(
                    "duplicate roster row for game {} team {} {} {}, keeping the later one",
                    e.game_id,
                    e.team_id,
                    e.quarter,
                    e.position
                );
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_assignment(&self, game: GameId, team: TeamId, quarter: Quarter) -> LineupAssignment {
        Position::ALL
            .into_iter()
            .fold(LineupAssignment::empty(), |acc, position| {
                let player = self
                    .entries
                    .get(&(game, team, quarter, position))
                    .copied()
                    .flatten();
                acc.with_slot(position, player)
            })
    }

    /// Upsert one slot. Callers guarantee the player is not already on court
    /// elsewhere in the same quarter.
    pub fn set_assignment(
        &mut self,
        game: GameId,
        team: TeamId,
        quarter: Quarter,
        position: Position,
        player: Option<PlayerId>,
    ) -> RosterEntry {
        self.entries.insert((game, team, quarter, position), player);
        RosterEntry {
            game_id: game,
            team_id: team,
            quarter,
            position,
            player_id: player,
        }
    }

    /// Write every slot of a lineup for one quarter.
    pub fn apply_lineup(
        &mut self,
        game: GameId,
        team: TeamId,
        quarter: Quarter,
        lineup: &LineupAssignment,
    ) -> Vec<RosterEntry> {
        lineup
            .iter()
            .map(|(position, player)| self.set_assignment(game, team, quarter, position, player))
            .collect()
    }

    pub fn copy_quarter(
        &mut self,
        game: GameId,
        team: TeamId,
        from: Quarter,
        to: Quarter,
    ) -> Vec<RosterEntry> {
        let lineup = self.get_assignment(game, team, from);
        self.apply_lineup(game, team, to, &lineup)
    }

    /// Drop every row of a game (the game itself was deleted).
    pub fn delete_game(&mut self, game: GameId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.0 != game);
        before - self.entries.len()
    }

    pub fn entries_for_game(&self, game: GameId, table: &PositionTable) -> Vec<RosterEntry> {
        let mut rows: Vec<RosterEntry> = self
            .entries
            .iter()
            .filter(|(key, _)| key.0 == game)
            .map(|(&(game_id, team_id, quarter, position), &player_id)| RosterEntry {
                game_id,
                team_id,
                quarter,
                position,
                player_id,
            })
            .collect();
        rows.sort_by_key(|r| (r.team_id, r.quarter, table.rank(r.position)));
        rows
    }

    pub fn quarters_played(&self, game: GameId, team: TeamId, player: PlayerId) -> usize {
        Quarter::ALL
            .into_iter()
            .filter(|q| {
                self.get_assignment(game, team, *q)
                    .position_of(player)
                    .is_some()
            })
            .count()
    }

    pub fn entries(&self) -> Vec<RosterEntry> {
        let mut rows: Vec<RosterEntry> = self
            .entries
            .iter()
            .map(|(&(game_id, team_id, quarter, position), &player_id)| RosterEntry {
                game_id,
                team_id,
                quarter,
                position,
                player_id,
            })
            .collect();
        rows.sort_by_key(|r| (r.game_id, r.team_id, r.quarter, r.position));
        rows
    }
}
