use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::counters::{Counters, PositionStats, RawCounters};
use crate::model::{GameId, PlayerId, Position, PositionTable, Quarter, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub quarter: Quarter,
    pub position: Position,
    #[serde(flatten)]
    pub counters: Counters,
}

impl StatRecord {
    pub fn key(&self) -> StatKey {
        StatKey {
            game_id: self.game_id,
            team_id: self.team_id,
            player_id: self.player_id,
            quarter: self.quarter,
            position: self.position,
        }
    }

    pub fn position_stats(&self, table: &PositionTable) -> PositionStats {
        self.counters.for_position(self.position, table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatKey {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub quarter: Quarter,
    pub position: Position,
}

/// Per-position statistic rows. Re-saving a key replaces the whole record.
#[derive(Debug, Clone, Default)]
pub struct StatStore {
    records: HashMap<StatKey, Counters>,
}

impl StatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = StatRecord>) -> Self {
        let mut store = Self::new();
        for r in records {
            if store.records.insert(r.key(), r.counters).is_some() {
                log::warn!(
                    "duplicate stat row for game {} player {} {} {}, keeping the later one",
                    r.game_id,
                    r.player_id,
                    r.quarter,
                    r.position
                );
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn upsert_stat(
        &mut self,
        game: GameId,
        team: TeamId,
        player: PlayerId,
        quarter: Quarter,
        position: Position,
        raw: &RawCounters,
    ) -> StatRecord {
        let counters = raw.coerce();
        let key = StatKey {
            game_id: game,
            team_id: team,
            player_id: player,
            quarter,
            position,
        };
        self.records.insert(key, counters);
        record_from(key, counters)
    }

    pub fn get(&self, key: &StatKey) -> Option<StatRecord> {
        self.records.get(key).map(|c| record_from(*key, *c))
    }

    /// Rows for one game, in no particular order.
    pub fn list_stats(&self, game: GameId) -> Vec<StatRecord> {
        self.records
            .iter()
            .filter(|(key, _)| key.game_id == game)
            .map(|(key, c)| record_from(*key, *c))
            .collect()
    }

    pub fn delete_stat(&mut self, key: &StatKey) -> Option<StatRecord> {
        self.records.remove(key).map(|c| record_from(*key, c))
    }

    pub fn delete_game(&mut self, game: GameId) -> usize {
        let before = self.records.len();
        self.records.retain(|key, _| key.game_id != game);
        before - self.records.len()
    }

    pub fn by_game(&self) -> HashMap<GameId, Vec<StatRecord>> {
        let mut out: HashMap<GameId, Vec<StatRecord>> = HashMap::new();
        for (key, c) in &self.records {
            out.entry(key.game_id)
                .or_default()
                .push(record_from(*key, *c));
        }
        out
    }

    pub fn records(&self) -> Vec<StatRecord> {
        let mut rows: Vec<StatRecord> = self
            .records
            .iter()
            .map(|(key, c)| record_from(*key, *c))
            .collect();
        rows.sort_by_key(|r| r.key());
        rows
    }
}

/// Display order: quarter, then court position.
pub fn sort_for_display(rows: &mut [StatRecord], table: &PositionTable) {
    rows.sort_by_key(|r| (r.quarter, table.rank(r.position), r.player_id));
}

fn record_from(key: StatKey, counters: Counters) -> StatRecord {
    StatRecord {
        game_id: key.game_id,
        team_id: key.team_id,
        player_id: key.player_id,
        quarter: key.quarter,
        position: key.position,
        counters,
    }
}
