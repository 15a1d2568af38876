use courtside::lineup::{
    EditOutcome, LineupAssignment, LineupEdit, LineupEditor, apply_edit, assign_to_position,
    clear_all, return_to_bench,
};
use courtside::model::{Player, Position};

fn player(id: u64, name: &str) -> Player {
    Player {
        id,
        display_name: name.to_string(),
        team_id: Some(1),
    }
}

fn pool() -> Vec<Player> {
    vec![
        player(1, "Ava"),
        player(2, "Mia"),
        player(3, "Zoe"),
        player(4, "Isla"),
        player(5, "Ruby"),
        player(6, "Chloe"),
        player(7, "Grace"),
        player(8, "Ella"),
        player(9, "Lily"),
    ]
}

fn full_court() -> LineupAssignment {
    Position::ALL
        .into_iter()
        .zip(1u64..)
        .fold(LineupAssignment::empty(), |acc, (pos, id)| {
            assign_to_position(&acc, pos, id)
        })
}

#[test]
fn court_player_swaps_with_occupant() {
    // P holds WD, Q holds GS.
    let start = assign_to_position(&LineupAssignment::empty(), Position::WD, 5);
    let start = assign_to_position(&start, Position::GS, 9);
    let start = assign_to_position(&start, Position::C, 3);

    let next = assign_to_position(&start, Position::GS, 5);
    assert_eq!(next.get(Position::GS), Some(5));
    assert_eq!(next.get(Position::WD), Some(9));
    assert_eq!(next.get(Position::C), Some(3));
    for pos in [Position::GA, Position::WA, Position::GD, Position::GK] {
        assert_eq!(next.get(pos), start.get(pos));
    }
    // The input is untouched.
    assert_eq!(start.get(Position::GS), Some(9));
}

#[test]
fn moving_to_empty_slot_vacates_old_one() {
    let start = assign_to_position(&LineupAssignment::empty(), Position::GA, 2);
    let next = assign_to_position(&start, Position::GK, 2);
    assert_eq!(next.get(Position::GK), Some(2));
    assert_eq!(next.get(Position::GA), None);
}

#[test]
fn bench_player_displaces_occupant_to_bench() {
    let court = full_court();
    let next = assign_to_position(&court, Position::C, 8);
    assert_eq!(next.get(Position::C), Some(8));
    assert_eq!(next.position_of(4), None);
    let bench: Vec<u64> = next.bench(&pool()).iter().map(|p| p.id).collect();
    assert_eq!(bench, vec![4, 9]);
}

#[test]
fn same_position_is_a_no_op_and_assign_is_idempotent() {
    let court = full_court();
    assert_eq!(assign_to_position(&court, Position::GS, 1), court);

    let once = assign_to_position(&court, Position::GD, 3);
    let twice = assign_to_position(&once, Position::GD, 3);
    assert_eq!(once, twice);
}

#[test]
fn no_player_ever_holds_two_slots() {
    let mut lineup = LineupAssignment::empty();
    // Deterministic walk over positions and a pool larger than the court.
    let mut seed: u64 = 0x2545_f491;
    for _ in 0..2_000 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let pos = Position::ALL[((seed >> 33) % 7) as usize];
        let id = (seed >> 17) % 10 + 1;
        lineup = match (seed >> 5) % 10 {
            0 => return_to_bench(&lineup, pos),
            _ => assign_to_position(&lineup, pos, id),
        };
        assert!(lineup.is_valid(), "duplicate after assigning {id} to {pos}");
        let idempotent = assign_to_position(&lineup, pos, id);
        assert_eq!(assign_to_position(&idempotent, pos, id), idempotent);
    }
}

#[test]
fn bench_and_clear() {
    let court = full_court();
    let benched = return_to_bench(&court, Position::WA);
    assert_eq!(benched.get(Position::WA), None);
    assert_eq!(benched.filled(), 6);
    assert!(benched.bench(&pool()).iter().any(|p| p.id == 3));

    let cleared = clear_all();
    assert_eq!(cleared.filled(), 0);
    assert_eq!(apply_edit(&court, LineupEdit::ClearAll), cleared);
    assert_eq!(cleared.bench(&pool()).len(), 9);
}

#[test]
fn editor_rejects_players_outside_the_pool() {
    let mut editor = LineupEditor::new(pool());
    assert_eq!(
        editor.apply(LineupEdit::Assign {
            position: Position::GS,
            player: 42,
        }),
        EditOutcome::Rejected
    );
    assert_eq!(
        editor.apply(LineupEdit::Assign {
            position: Position::GS,
            player: 1,
        }),
        EditOutcome::Applied
    );
    assert_eq!(
        editor.apply(LineupEdit::Assign {
            position: Position::GS,
            player: 1,
        }),
        EditOutcome::Unchanged
    );
    assert_eq!(editor.bench().len(), 8);
    assert_eq!(
        editor.apply(LineupEdit::Bench {
            position: Position::GS
        }),
        EditOutcome::Applied
    );
    assert_eq!(editor.assignment().filled(), 0);
}

#[test]
fn editor_drops_saved_slots_for_unknown_players() {
    let saved = assign_to_position(&full_court(), Position::GK, 40);
    let editor = LineupEditor::with_assignment(pool(), saved);
    assert_eq!(editor.assignment().get(Position::GK), None);
    assert_eq!(editor.assignment().get(Position::GS), Some(1));
}

#[test]
fn edits_deserialize_from_tagged_json() {
    let edit: LineupEdit =
        serde_json::from_str(r#"{"op":"assign","position":"WD","player":4}"#).expect("edit json");
    assert_eq!(
        edit,
        LineupEdit::Assign {
            position: Position::WD,
            player: 4
        }
    );
}
