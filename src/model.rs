use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type GameId = u64;
pub type TeamId = u64;
pub type PlayerId = u64;
pub type ClubId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    GS,
    GA,
    WA,
    C,
    WD,
    GD,
    GK,
}

impl Position {
    /// Court order, shooter end first.
    pub const ALL: [Position; 7] = [
        Position::GS,
        Position::GA,
        Position::WA,
        Position::C,
        Position::WD,
        Position::GD,
        Position::GK,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Position::GS => "GS",
            Position::GA => "GA",
            Position::WA => "WA",
            Position::C => "C",
            Position::WD => "WD",
            Position::GD => "GD",
            Position::GK => "GK",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim().to_ascii_uppercase();
        Position::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| format!("unknown position {raw:?}"))
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionGroup {
    Attack,
    Mid,
    Defense,
}

/// Court layout used by aggregation: group membership plus the two scoring
/// units. Built once and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTable {
    order: [Position; 7],
    groups: [PositionGroup; 7],
    attack_unit: [Position; 2],
    defense_unit: [Position; 2],
}

impl PositionTable {
    pub fn standard() -> Self {
        Self {
            order: Position::ALL,
            groups: [
                PositionGroup::Attack,
                PositionGroup::Attack,
                PositionGroup::Mid,
                PositionGroup::Mid,
                PositionGroup::Mid,
                PositionGroup::Defense,
                PositionGroup::Defense,
            ],
            attack_unit: [Position::GS, Position::GA],
            defense_unit: [Position::GD, Position::GK],
        }
    }

    pub fn order(&self) -> &[Position; 7] {
        &self.order
    }

    pub fn group(&self, position: Position) -> PositionGroup {
        self.groups[position.index()]
    }

    pub fn attack_unit(&self) -> [Position; 2] {
        self.attack_unit
    }

    pub fn defense_unit(&self) -> [Position; 2] {
        self.defense_unit
    }

    /// Rank of a position in court order, for display sorting.
    pub fn rank(&self, position: Position) -> usize {
        self.order
            .iter()
            .position(|p| *p == position)
            .unwrap_or(self.order.len())
    }
}

impl Default for PositionTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quarter(u8);

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter(1), Quarter(2), Quarter(3), Quarter(4)];

    pub fn new(n: u8) -> Option<Self> {
        (1..=4).contains(&n).then_some(Self(n))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for Quarter {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quarter::new(value).ok_or_else(|| format!("quarter out of range: {value}"))
    }
}

impl From<Quarter> for u8 {
    fn from(value: Quarter) -> Self {
        value.0
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    Upcoming,
    InProgress,
    Completed,
    ForfeitWin,
    ForfeitLoss,
    Bye,
    Abandoned,
}

impl GameStatus {
    pub fn allows_statistics(self) -> bool {
        matches!(
            self,
            GameStatus::Completed | GameStatus::ForfeitWin | GameStatus::ForfeitLoss
        )
    }

    pub fn is_forfeit(self) -> bool {
        matches!(self, GameStatus::ForfeitWin | GameStatus::ForfeitLoss)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub home_team_id: TeamId,
    // None for games against an external opponent, or a bye.
    #[serde(default)]
    pub away_team_id: Option<TeamId>,
    pub date: NaiveDate,
    #[serde(default)]
    pub round: u32,
    pub status: GameStatus,
    #[serde(default)]
    pub allows_statistics: Option<bool>,
}

impl Game {
    pub fn allows_statistics(&self) -> bool {
        self.allows_statistics
            .unwrap_or_else(|| self.status.allows_statistics())
    }

    /// Completed with statistics enabled: the filter used by season aggregates.
    pub fn counts_for_season(&self) -> bool {
        self.status == GameStatus::Completed && self.allows_statistics()
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team_id == team || self.away_team_id == Some(team)
    }

    pub fn is_away_team(&self, team: TeamId) -> bool {
        self.away_team_id == Some(team) && self.home_team_id != team
    }

    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if self.home_team_id == team {
            self.away_team_id
        } else if self.away_team_id == Some(team) {
            Some(self.home_team_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub quarter: Quarter,
    pub position: Position,
    pub player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub club_id: ClubId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    #[serde(default)]
    pub team_id: Option<TeamId>,
}
