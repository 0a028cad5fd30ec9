//! Integration tests for the replay pipeline.
//!
//! Snapshot files are written to a temporary directory, replayed through a
//! [`GameHub`], and the JSON-lines output and final ledgers are checked.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use puckline_analysis::MomentumConfig;
use puckline_core::hub::GameHub;
use puckline_core::runner::run_replay;
use puckline_core::source::{DirectorySource, JsonLinesSink, RoutedSnapshot, VecSource};
use puckline_types::{GameClock, GameId, GameStatus, Snapshot};
use serde_json::{Value, json};

fn write_snapshot(dir: &Path, name: &str, body: &Value) {
    std::fs::write(dir.join(name), serde_json::to_string(body).unwrap()).unwrap();
}

fn goal(id: &str, team: &str) -> Value {
    json!({
        "event_id": id,
        "type": "goal",
        "team_side": team,
        "details": { "scorer": "Scorer" }
    })
}

#[tokio::test]
async fn replays_directory_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(
        dir.path(),
        "0001.json",
        &json!({ "game_id": "home-game", "clock": { "period": 1, "time_remaining": "10:00" }, "events": [goal("1", "home")] }),
    );
    write_snapshot(
        dir.path(),
        "0002.json",
        &json!({ "game_id": "other-game", "clock": { "period": 4, "time_remaining": "02:00" }, "events": [goal("1", "away")] }),
    );
    write_snapshot(
        dir.path(),
        "0003.json",
        &json!({ "game_id": "home-game", "clock": { "period": 1, "time_remaining": "09:30" }, "events": [goal("1", "home")] }),
    );

    let mut source = DirectorySource::open(dir.path()).unwrap();
    let mut sink = JsonLinesSink::new(Vec::new());
    let mut hub = GameHub::new(MomentumConfig::default(), 2);

    let summary = run_replay(&mut source, &mut sink, &mut hub, 2).await.unwrap();
    assert_eq!(summary.snapshots, 3);
    assert_eq!(summary.new_events, 2);
    assert_eq!(summary.play_by_play, 1);
    assert_eq!(summary.mixed_coverage, 1);
    assert_eq!(summary.filler_content, 1);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let reports: Vec<Value> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    let scores: Vec<u64> = reports
        .iter()
        .map(|r| r["aggregate_momentum_score"].as_u64().unwrap())
        .collect();
    assert_eq!(scores, vec![65, 163, 0]);
    assert_eq!(reports[1]["game_id"], "other-game");

    let ledgers = hub.shutdown().await.unwrap();
    assert_eq!(ledgers.len(), 2);
    let home = ledgers.get(&GameId::new("home-game")).unwrap();
    assert_eq!(home.score().home, 1);
    assert_eq!(home.snapshots_applied(), 2);
    assert_eq!(home.status(), GameStatus::Live);
}

#[tokio::test]
async fn in_memory_source_feeds_hub() {
    let game = GameId::new("g");
    let mut source = VecSource::new(vec![
        RoutedSnapshot {
            game_id: game.clone(),
            snapshot: Snapshot::empty(GameClock::default()),
        },
        RoutedSnapshot {
            game_id: game.clone(),
            snapshot: Snapshot::empty(GameClock::default()),
        },
    ]);
    let mut sink = JsonLinesSink::new(Vec::new());
    let mut hub = GameHub::new(MomentumConfig::default(), 1);

    let summary = run_replay(&mut source, &mut sink, &mut hub, 1).await.unwrap();
    assert_eq!(summary.snapshots, 2);
    assert_eq!(summary.filler_content, 2);
    assert_eq!(sink.written(), 2);
    assert!(hub.is_tracked(&game));
}
