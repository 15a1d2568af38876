use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use courtside::model::{GameStatus, Position, PositionTable, Quarter};
use courtside::query_cache::QueryCache;
use courtside::report::{ReportInputs, build_reports, build_team_report, render_team_report};
use courtside::snapshot::{load_snapshot, parse_snapshot_json, save_snapshot};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_season_fixture() {
    let data = parse_snapshot_json(&read_fixture("season.json")).expect("fixture should parse");
    assert_eq!(data.teams.len(), 3);
    assert_eq!(data.games.len(), 6);
    assert_eq!(data.game(3).map(|g| g.status), Some(GameStatus::ForfeitWin));
    assert_eq!(data.stats.len(), 6);
    assert_eq!(data.scores.len(), 8);
    assert_eq!(data.team_players(10).len(), 4);

    let q1 = data
        .roster
        .get_assignment(1, 10, Quarter::new(1).expect("quarter"));
    assert_eq!(q1.get(Position::GS), Some(101));
    assert_eq!(q1.get(Position::C), None);

    // "abc" in the entry form is stored as zero.
    let ga = data
        .stats
        .list_stats(1)
        .into_iter()
        .find(|r| r.player_id == 102)
        .expect("GA row");
    assert_eq!(ga.counters.goals_for, 0);
    assert_eq!(ga.counters.intercepts, 1);
}

#[test]
fn null_and_empty_snapshots_are_empty() {
    assert!(parse_snapshot_json("null").expect("null").games.is_empty());
    assert!(parse_snapshot_json("  ").expect("blank").games.is_empty());
}

#[test]
fn rejects_unknown_version_and_bad_quarters() {
    assert!(parse_snapshot_json(r#"{"version":99}"#).is_err());
    let bad = r#"{"version":1,"scores":[{"game_id":1,"team_id":1,"quarter":5,"score":3}]}"#;
    assert!(parse_snapshot_json(bad).is_err());
}

#[test]
fn delete_game_cascades_rows() {
    let mut data = parse_snapshot_json(&read_fixture("season.json")).expect("fixture");
    assert!(data.delete_game(1));
    assert!(data.game(1).is_none());
    assert!(data.stats.list_stats(1).is_empty());
    assert!(data.scores.get_scores(1).is_empty());
    assert!(data.roster.entries_for_game(1, &PositionTable::standard()).is_empty());
    assert!(!data.delete_game(1));
}

#[test]
fn save_then_load_keeps_rows() {
    let data = parse_snapshot_json(&read_fixture("season.json")).expect("fixture");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let path = std::env::temp_dir()
        .join(format!("courtside-test-{}-{nanos}", std::process::id()))
        .join("snapshot.json");
    save_snapshot(&path, &data).expect("save should succeed");
    let loaded = load_snapshot(&path).expect("load should succeed");
    assert_eq!(loaded.games, data.games);
    assert_eq!(loaded.stats.records(), data.stats.records());
    assert_eq!(loaded.scores.records(), data.scores.records());
    assert_eq!(loaded.roster.entries(), data.roster.entries());
    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn save_reports_unusable_parent_directory() {
    let data = parse_snapshot_json(&read_fixture("season.json")).expect("fixture");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let blocker = std::env::temp_dir().join(format!(
        "courtside-blocker-{}-{nanos}",
        std::process::id()
    ));
    fs::write(&blocker, "not a directory").expect("write blocker file");
    let path = blocker.join("nested").join("snapshot.json");

    let err = save_snapshot(&path, &data).expect_err("parent is a file");
    assert!(err.to_string().starts_with("create "), "got: {err}");
    let _ = fs::remove_file(&blocker);
}

#[test]
fn reports_are_cached_per_team() {
    let data = parse_snapshot_json(&read_fixture("season.json")).expect("fixture");
    let inputs = ReportInputs::new(&data, PositionTable::standard());
    let t0 = UNIX_EPOCH + Duration::from_secs(10_000);
    let mut cache = QueryCache::new(Duration::from_secs(300));

    let reports = build_reports(&inputs, &[(10, 1), (20, 2)], 2, &mut cache, t0);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].team_name, "Kestrels 13U");
    assert_eq!(reports[0].record.wins, 3);
    assert_eq!(reports[1].record.losses, 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(reports[0], build_team_report(&inputs, 10, 1));

    let again = build_reports(&inputs, &[(10, 1)], 2, &mut cache, t0 + Duration::from_secs(60));
    assert_eq!(again[0], reports[0]);

    let text = render_team_report(&reports[0]);
    assert!(text.contains("Kestrels 13U"));
    assert!(text.contains("W3 L0 D1"));
}
