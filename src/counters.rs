use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{PositionGroup, PositionTable, Position};

/// Counter values as they arrive from an entry form: numbers, numeric strings,
/// or junk. Missing fields stay `None` and default to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCounters {
    #[serde(default)]
    pub goals_for: Option<Value>,
    #[serde(default)]
    pub goals_against: Option<Value>,
    #[serde(default)]
    pub missed_goals: Option<Value>,
    #[serde(default)]
    pub rebounds: Option<Value>,
    #[serde(default)]
    pub intercepts: Option<Value>,
    #[serde(default)]
    pub bad_pass: Option<Value>,
    #[serde(default)]
    pub handling_error: Option<Value>,
    #[serde(default)]
    pub pick_up: Option<Value>,
    #[serde(default)]
    pub infringement: Option<Value>,
}

impl RawCounters {
    pub fn coerce(&self) -> Counters {
        Counters {
            goals_for: coerce_field("goals_for", self.goals_for.as_ref()),
            goals_against: coerce_field("goals_against", self.goals_against.as_ref()),
            missed_goals: coerce_field("missed_goals", self.missed_goals.as_ref()),
            rebounds: coerce_field("rebounds", self.rebounds.as_ref()),
            intercepts: coerce_field("intercepts", self.intercepts.as_ref()),
            bad_pass: coerce_field("bad_pass", self.bad_pass.as_ref()),
            handling_error: coerce_field("handling_error", self.handling_error.as_ref()),
            pick_up: coerce_field("pick_up", self.pick_up.as_ref()),
            infringement: coerce_field("infringement", self.infringement.as_ref()),
        }
    }
}

impl From<Counters> for RawCounters {
    fn from(c: Counters) -> Self {
        Self {
            goals_for: Some(Value::from(c.goals_for)),
            goals_against: Some(Value::from(c.goals_against)),
            missed_goals: Some(Value::from(c.missed_goals)),
            rebounds: Some(Value::from(c.rebounds)),
            intercepts: Some(Value::from(c.intercepts)),
            bad_pass: Some(Value::from(c.bad_pass)),
            handling_error: Some(Value::from(c.handling_error)),
            pick_up: Some(Value::from(c.pick_up)),
            infringement: Some(Value::from(c.infringement)),
        }
    }
}

fn coerce_field(name: &str, raw: Option<&Value>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    match coerce_counter(raw) {
        Some(v) => v,
        None => {
            log::debug!("counter {name} value {raw} is not a count, stored as 0");
            0
        }
    }
}

/// Lenient integer coercion. Returns `None` when the value had to be dropped
/// to zero (unparsable or negative), so callers can log it.
pub fn coerce_counter(raw: &Value) -> Option<u32> {
    match raw {
        Value::Null => Some(0),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Some(u32::try_from(v).unwrap_or(u32::MAX));
            }
            if n.as_i64().is_some() {
                return None;
            }
            let f = n.as_f64()?;
            if f.is_finite() && f >= 0.0 {
                Some(f.trunc().min(u32::MAX as f64) as u32)
            } else {
                None
            }
        }
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

// Leading-digit parse: "12abc" -> 12, " 7" -> 7, "abc" / "-3" -> None.
fn parse_leading_int(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.starts_with('-') {
        return None;
    }
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub goals_against: u32,
    #[serde(default)]
    pub missed_goals: u32,
    #[serde(default)]
    pub rebounds: u32,
    #[serde(default)]
    pub intercepts: u32,
    #[serde(default)]
    pub bad_pass: u32,
    #[serde(default)]
    pub handling_error: u32,
    #[serde(default)]
    pub pick_up: u32,
    #[serde(default)]
    pub infringement: u32,
}

impl Counters {
    pub fn add(&mut self, other: &Counters) {
        self.goals_for = self.goals_for.saturating_add(other.goals_for);
        self.goals_against = self.goals_against.saturating_add(other.goals_against);
        self.missed_goals = self.missed_goals.saturating_add(other.missed_goals);
        self.rebounds = self.rebounds.saturating_add(other.rebounds);
        self.intercepts = self.intercepts.saturating_add(other.intercepts);
        self.bad_pass = self.bad_pass.saturating_add(other.bad_pass);
        self.handling_error = self.handling_error.saturating_add(other.handling_error);
        self.pick_up = self.pick_up.saturating_add(other.pick_up);
        self.infringement = self.infringement.saturating_add(other.infringement);
    }

    fn general(&self) -> GeneralStats {
        GeneralStats {
            intercepts: self.intercepts,
            bad_pass: self.bad_pass,
            handling_error: self.handling_error,
            pick_up: self.pick_up,
            infringement: self.infringement,
        }
    }

    /// View the raw counters through a position group, dropping fields that
    /// mean nothing for it (a centre has no goals for or against).
    pub fn for_group(&self, group: PositionGroup) -> PositionStats {
        match group {
            PositionGroup::Attack => PositionStats::Attack(AttackStats {
                goals_for: self.goals_for,
                missed_goals: self.missed_goals,
                rebounds: self.rebounds,
                general: self.general(),
            }),
            PositionGroup::Mid => PositionStats::Mid(MidStats {
                general: self.general(),
            }),
            PositionGroup::Defense => PositionStats::Defense(DefenseStats {
                goals_against: self.goals_against,
                rebounds: self.rebounds,
                general: self.general(),
            }),
        }
    }

    pub fn for_position(&self, position: Position, table: &PositionTable) -> PositionStats {
        self.for_group(table.group(position))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralStats {
    pub intercepts: u32,
    pub bad_pass: u32,
    pub handling_error: u32,
    pub pick_up: u32,
    pub infringement: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackStats {
    pub goals_for: u32,
    pub missed_goals: u32,
    pub rebounds: u32,
    pub general: GeneralStats,
}

impl AttackStats {
    /// Share of attempts converted, in percent. `None` with no attempts.
    pub fn shooting_pct(&self) -> Option<f64> {
        let attempts = self.goals_for + self.missed_goals;
        (attempts > 0).then(|| self.goals_for as f64 / attempts as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidStats {
    pub general: GeneralStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseStats {
    pub goals_against: u32,
    pub rebounds: u32,
    pub general: GeneralStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "group", rename_all = "lowercase")]
pub enum PositionStats {
    Attack(AttackStats),
    Mid(MidStats),
    Defense(DefenseStats),
}

impl PositionStats {
    pub fn general(&self) -> &GeneralStats {
        match self {
            PositionStats::Attack(s) => &s.general,
            PositionStats::Mid(s) => &s.general,
            PositionStats::Defense(s) => &s.general,
        }
    }

    pub fn goals_for(&self) -> u32 {
        match self {
            PositionStats::Attack(s) => s.goals_for,
            _ => 0,
        }
    }

    pub fn goals_against(&self) -> u32 {
        match self {
            PositionStats::Defense(s) => s.goals_against,
            _ => 0,
        }
    }
}
