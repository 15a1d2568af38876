use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::counters::RawCounters;
use crate::model::{Game, GameId, Player, PlayerId, Position, Quarter, RosterEntry, Team, TeamId};
use crate::roster::RosterTable;
use crate::score_store::{ScoreRecord, ScoreStore};
use crate::stat_store::{StatRecord, StatStore};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Stat row as exported by the entry forms; counters may still be strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatInput {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    pub quarter: Quarter,
    pub position: Position,
    #[serde(flatten)]
    pub counters: RawCounters,
}

impl From<StatRecord> for StatInput {
    fn from(r: StatRecord) -> Self {
        Self {
            game_id: r.game_id,
            team_id: r.team_id,
            player_id: r.player_id,
            quarter: r.quarter,
            position: r.position,
            counters: r.counters.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    players: Vec<Player>,
    #[serde(default)]
    games: Vec<Game>,
    #[serde(default)]
    roster: Vec<RosterEntry>,
    #[serde(default)]
    stats: Vec<StatInput>,
    #[serde(default)]
    scores: Vec<ScoreRecord>,
}

/// Everything the reports read: one club's games with their roster, stat and
/// score rows.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub games: Vec<Game>,
    pub roster: RosterTable,
    pub stats: StatStore,
    pub scores: ScoreStore,
}

impl Dataset {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn team_players(&self, team: TeamId) -> Vec<Player> {
        self.players
            .iter()
            .filter(|p| p.team_id == Some(team))
            .cloned()
            .collect()
    }

    pub fn scores_by_game(&self) -> HashMap<GameId, Vec<ScoreRecord>> {
        self.scores.by_game()
    }

    pub fn stats_by_game(&self) -> HashMap<GameId, Vec<StatRecord>> {
        self.stats.by_game()
    }

    /// Remove a game and every row hanging off it.
    pub fn delete_game(&mut self, id: GameId) -> bool {
        let before = self.games.len();
        self.games.retain(|g| g.id != id);
        let removed = self.games.len() != before;
        let roster = self.roster.delete_game(id);
        let stats = self.stats.delete_game(id);
        let scores = self.scores.delete_game(id);
        log::debug!(
            "deleted game {id}: {roster} roster rows, {stats} stat rows, {scores} score rows"
        );
        removed
    }
}

pub fn parse_snapshot_json(raw: &str) -> Result<Dataset> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Dataset::default());
    }
    let file: SnapshotFile = serde_json::from_str(trimmed).context("invalid snapshot json")?;
    if file.version != SNAPSHOT_VERSION {
        return Err(anyhow!(
            "unsupported snapshot version {} (expected {})",
            file.version,
            SNAPSHOT_VERSION
        ));
    }

    let mut stats = StatStore::new();
    for row in &file.stats {
        stats.upsert_stat(
            row.game_id,
            row.team_id,
            row.player_id,
            row.quarter,
            row.position,
            &row.counters,
        );
    }

    Ok(Dataset {
        teams: file.teams,
        players: file.players,
        games: file.games,
        roster: RosterTable::from_entries(file.roster),
        stats,
        scores: ScoreStore::from_records(file.scores),
    })
}

pub fn load_snapshot(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    parse_snapshot_json(&raw).with_context(|| format!("parse snapshot {}", path.display()))
}

pub fn save_snapshot(path: &Path, data: &Dataset) -> Result<()> {
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        teams: data.teams.clone(),
        players: data.players.clone(),
        games: data.games.clone(),
        roster: data.roster.entries(),
        stats: data.stats.records().into_iter().map(StatInput::from).collect(),
        scores: data.scores.records(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(&file).context("serialize snapshot")?;
    fs::write(&tmp, json).context("write snapshot")?;
    fs::rename(&tmp, path).context("swap snapshot")?;
    Ok(())
}
