use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{GameId, Quarter, TeamId};

/// Official quarter score for one team. Wins over summed stat rows whenever
/// both exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub quarter: Quarter,
    pub score: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    records: HashMap<(GameId, TeamId, Quarter), u32>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ScoreRecord>) -> Self {
        let mut store = Self::new();
        for r in records {
            if store
                .records
                .insert((r.game_id, r.team_id, r.quarter), r.score)
                .is_some()
            {
                log::warn!(
                    "duplicate score row for game {} team {} {}, keeping the later one",
                    r.game_id,
                    r.team_id,
                    r.quarter
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

    pub fn upsert_score(
        &mut self,
        game: GameId,
        team: TeamId,
        quarter: Quarter,
        score: u32,
    ) -> ScoreRecord {
        self.records.insert((game, team, quarter), score);
        ScoreRecord {
            game_id: game,
            team_id: team,
            quarter,
            score,
        }
    }

    pub fn get_scores(&self, game: GameId) -> Vec<ScoreRecord> {
        let mut rows: Vec<ScoreRecord> = self
            .records
            .iter()
            .filter(|(key, _)| key.0 == game)
            .map(|(&(game_id, team_id, quarter), &score)| ScoreRecord {
                game_id,
                team_id,
                quarter,
                score,
            })
            .collect();
        rows.sort_by_key(|r| (r.quarter, r.team_id));
        rows
    }

    pub fn delete_game(&mut self, game: GameId) -> usize {
        let before = self.records.len();
        self.records.retain(|key, _| key.0 != game);
        before - self.records.len()
    }

    pub fn by_game(&self) -> HashMap<GameId, Vec<ScoreRecord>> {
        let mut out: HashMap<GameId, Vec<ScoreRecord>> = HashMap::new();
        for (&(game_id, team_id, quarter), &score) in &self.records {
            out.entry(game_id).or_default().push(ScoreRecord {
                game_id,
                team_id,
                quarter,
                score,
            });
        }
        for rows in out.values_mut() {
            rows.sort_by_key(|r| (r.quarter, r.team_id));
        }
        out
    }

    pub fn records(&self) -> Vec<ScoreRecord> {
        let mut rows: Vec<ScoreRecord> = self.by_game().into_values().flatten().collect();
        rows.sort_by_key(|r| (r.game_id, r.quarter, r.team_id));
        rows
    }
}
