use std::fs;

use roster_core::{EngineOptions, RawPlayer, RosterEngine};
use roster_model::LeagueConfig;
use roster_persistence::{
    CURRENT_SCHEMA_VERSION, JsonFileStore, MemoryStore, PersistenceError, StateStore,
};
use tempfile::tempdir;

fn engine() -> RosterEngine {
    let mut engine = RosterEngine::new(LeagueConfig::default(), EngineOptions::default());
    engine.import(vec![
        RawPlayer::new("Ann Lee")
            .with_gender("f")
            .with_skill("7")
            .with_teammates("Bea Ray"),
        RawPlayer::new("Bea Ray")
            .with_gender("f")
            .with_skill("6")
            .with_teammates("Ann Lee"),
        RawPlayer::new("Cal Dunn").with_gender("m").with_teammates("anne"),
    ]);
    let team = engine.create_team("Red");
    engine
        .move_player(roster_model::PlayerId::new(0), Some(team))
        .unwrap();
    engine
}

#[test]
fn state_round_trips_through_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    let engine = engine();

    let mut store = JsonFileStore::new(&path);
    store.save(engine.state()).unwrap();
    let loaded = store.load().unwrap().unwrap();

    assert_eq!(&loaded, engine.state());
    assert_eq!(loaded.roster.groups.len(), 1);
    assert_eq!(loaded.roster.teams[0].members.len(), 2);
}

#[test]
fn envelope_records_version_and_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    JsonFileStore::new(&path).write(engine().state()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["schema_version"], CURRENT_SCHEMA_VERSION);
    assert!(raw["saved_at"].is_string());
    assert!(raw["state"]["roster"]["players"].is_array());
}

#[test]
fn saving_again_replaces_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    let mut store = JsonFileStore::new(&path);
    let mut engine = engine();
    store.save(engine.state()).unwrap();

    engine.reset_assignments();
    store.save(engine.state()).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert!(loaded.roster.players.iter().all(|p| p.team.is_none()));
}

#[test]
fn corrupted_body_reports_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    fs::write(&path, r#"{ "schema_version": 1, "saved_at": "", "state": { "roster": 7 } }"#)
        .unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, PersistenceError::Deserialization { .. }));
    assert!(err.user_message().contains("line 1"));
}

#[test]
fn memory_store_behaves_like_a_file() {
    let engine = engine();
    let mut store = MemoryStore::new();
    store.save(engine.state()).unwrap();
    let state = store.load().unwrap().unwrap();
    let restored = RosterEngine::from_state(state, EngineOptions::default());
    assert_eq!(restored.state(), engine.state());
}
