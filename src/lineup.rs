use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Player, PlayerId, Position};

/// One quarter's court: a slot per position, in court order. The bench is
/// never stored; it is whoever in the pool holds no slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupAssignment {
    slots: [Option<PlayerId>; 7],
}

impl LineupAssignment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, position: Position) -> Option<PlayerId> {
        self.slots[position.index()]
    }

    pub fn position_of(&self, player: PlayerId) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|p| self.slots[p.index()] == Some(player))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Option<PlayerId>)> + '_ {
        Position::ALL
            .into_iter()
            .map(move |p| (p, self.slots[p.index()]))
    }

    pub fn assigned_ids(&self) -> HashSet<PlayerId> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// No player holds two slots.
    pub fn is_valid(&self) -> bool {
        let mut seen = HashSet::new();
        self.slots.iter().flatten().all(|id| seen.insert(*id))
    }

    /// Raw slot write for loading persisted rows. Does not enforce uniqueness.
    pub(crate) fn with_slot(mut self, position: Position, player: Option<PlayerId>) -> Self {
        self.slots[position.index()] = player;
        self
    }

    pub fn bench<'a>(&self, available: &'a [Player]) -> Vec<&'a Player> {
        let assigned = self.assigned_ids();
        available
            .iter()
            .filter(|p| !assigned.contains(&p.id))
            .collect()
    }
}

/// Move `player` onto `position`. A player already on court elsewhere swaps
/// with whoever held the target; a bench player displaces the occupant to the
/// bench.
pub fn assign_to_position(
    current: &LineupAssignment,
    position: Position,
    player: PlayerId,
) -> LineupAssignment {
    let mut next = *current;
    let previous = current.position_of(player);
    if previous == Some(position) {
        return next;
    }

    let displaced = current.get(position);
    next.slots[position.index()] = Some(player);
    if let Some(old) = previous {
        next.slots[old.index()] = displaced;
    }
    next
}

pub fn return_to_bench(current: &LineupAssignment, position: Position) -> LineupAssignment {
    let mut next = *current;
    next.slots[position.index()] = None;
    next
}

pub fn clear_all() -> LineupAssignment {
    LineupAssignment::empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LineupEdit {
    Assign { position: Position, player: PlayerId },
    Bench { position: Position },
    ClearAll,
}

pub fn apply_edit(current: &LineupAssignment, edit: LineupEdit) -> LineupAssignment {
    match edit {
        LineupEdit::Assign { position, player } => assign_to_position(current, position, player),
        LineupEdit::Bench { position } => return_to_bench(current, position),
        LineupEdit::ClearAll => clear_all(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Unchanged,
    Rejected,
}

/// Editor session over a player pool. Holds the current assignment and
/// refuses edits that name players outside the pool.
#[derive(Debug, Clone)]
pub struct LineupEditor {
    available: Vec<Player>,
    assignment: LineupAssignment,
}

impl LineupEditor {
    pub fn new(available: Vec<Player>) -> Self {
        Self {
            available,
            assignment: LineupAssignment::empty(),
        }
    }

    /// Start from a saved assignment. Slots naming players outside the pool
    /// are dropped.
    pub fn with_assignment(available: Vec<Player>, assignment: LineupAssignment) -> Self {
        let pool: HashSet<PlayerId> = available.iter().map(|p| p.id).collect();
        let mut cleaned = assignment;
        for (position, slot) in assignment.iter() {
            if let Some(id) = slot {
                if !pool.contains(&id) {
                    log::warn!("player {id} at {position} is not in the pool, slot cleared");
                    cleaned = return_to_bench(&cleaned, position);
                }
            }
        }
        Self {
            available,
            assignment: cleaned,
        }
    }

    pub fn assignment(&self) -> &LineupAssignment {
        &self.assignment
    }

    pub fn available(&self) -> &[Player] {
        &self.available
    }

    pub fn bench(&self) -> Vec<&Player> {
        self.assignment.bench(&self.available)
    }

    pub fn is_available(&self, player: PlayerId) -> bool {
        self.available.iter().any(|p| p.id == player)
    }

    pub fn apply(&mut self, edit: LineupEdit) -> EditOutcome {
        if let LineupEdit::Assign { player, .. } = edit {
            if !self.is_available(player) {
                return EditOutcome::Rejected;
            }
        }
        let next = apply_edit(&self.assignment, edit);
        if next == self.assignment {
            return EditOutcome::Unchanged;
        }
        self.assignment = next;
        EditOutcome::Applied
    }
}
