use std::fs;

use roster_cli::csv_roster::read_roster;
use roster_cli::workspace::{
    Workspace, find_group, find_player, find_team, load_league_config, read_proposals,
};
use roster_core::{EngineOptions, ProposalOutcome};
use roster_model::{Gender, LeagueConfig, PlayerId, TeamId};
use tempfile::tempdir;

const ROSTER: &str = "\u{feff}Player Name,Sex,Skill Rating,Play With,Avoid,Shirt\n\
Ann Lee,F,7,Bea Ray,,M\n\
Bea Ray,f,6,\"Ann Lee\",,S\n\
Cal Dunn,m,eight,annie,Bea Ray,L\n\
Dee Fox,F,5\n";

#[test]
fn csv_columns_are_found_by_header() {
    let rows = read_roster(ROSTER.as_bytes()).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    insta::assert_snapshot!(names.join(" | "), @"Ann Lee | Bea Ray | Cal Dunn | Dee Fox");
    assert_eq!(rows[1].teammate_requests, "Ann Lee");
    assert_eq!(rows[2].avoid_requests, "Bea Ray");
    assert_eq!(rows[2].skill, "eight");
    assert!(rows[3].teammate_requests.is_empty());
}

#[test]
fn csv_without_name_column_is_rejected() {
    let err = read_roster("Gender,Skill\nf,5\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("no name column"));
}

#[test]
fn workspace_persists_between_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");

    let mut workspace = Workspace::fresh(&path, EngineOptions::default(), None);
    workspace.engine.import(read_roster(ROSTER.as_bytes()).unwrap());
    let red = workspace.engine.create_team("Red");
    workspace.save().unwrap();

    let reopened = Workspace::open(&path, EngineOptions::default(), None).unwrap();
    let engine = &reopened.engine;
    assert_eq!(engine.state().roster.players.len(), 4);
    assert_eq!(engine.groups().count(), 1);
    assert_eq!(engine.state().roster.players[2].gender, Gender::M);
    assert_eq!(find_team(engine, "red").unwrap(), Some(red));
    assert_eq!(find_team(engine, "T0").unwrap(), Some(red));
    assert_eq!(find_team(engine, "Unassigned").unwrap(), None);
    assert!(find_team(engine, "Blue").is_err());
    assert_eq!(find_player(engine, "cal dunn").unwrap(), PlayerId::new(2));
    assert_eq!(find_player(engine, "P3").unwrap(), PlayerId::new(3));
    assert!(find_player(engine, "Zed").is_err());
    let group = engine.groups().next().unwrap();
    assert_eq!(find_group(engine, &group.label.to_lowercase()).unwrap(), group.id);
}

#[test]
fn missing_state_starts_empty_with_given_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("league.json");
    fs::write(&config_path, r#"{ "max_team_size": 6, "min_females": 2 }"#).unwrap();
    let config = load_league_config(&config_path).unwrap();
    assert_eq!(config, LeagueConfig::default().with_max_team_size(6).with_min_females(2));

    let workspace = Workspace::open(
        &dir.path().join("absent.json"),
        EngineOptions::default(),
        Some(config.clone()),
    )
    .unwrap();
    assert!(workspace.engine.state().roster.players.is_empty());
    assert_eq!(workspace.engine.state().roster.config, config);
}

#[test]
fn newer_state_file_explains_itself() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.json");
    fs::write(&path, r#"{ "schema_version": 9, "saved_at": "", "state": {} }"#).unwrap();

    let err = Workspace::open(&path, EngineOptions::default(), None)
        .err()
        .unwrap();
    let text = format!("{err:#}");
    assert!(text.contains("newer release"));
    assert!(text.contains("hint:"));
}

#[test]
fn proposals_file_drives_the_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proposals.json");
    fs::write(
        &path,
        r#"[{ "player": 3, "source_team": null, "target_team": 0 },
            { "player": 3, "source_team": 1, "target_team": 0 }]"#,
    )
    .unwrap();

    let state_path = dir.path().join("s.json");
    let mut workspace = Workspace::fresh(&state_path, EngineOptions::default(), None);
    workspace.engine.import(read_roster(ROSTER.as_bytes()).unwrap());
    workspace.engine.create_team("Red");

    let outcomes = workspace.engine.apply_proposals(&read_proposals(&path).unwrap());
    assert!(outcomes[0].is_applied());
    assert_eq!(outcomes[1], ProposalOutcome::AlreadyInPlace);
    assert_eq!(workspace.engine.state().roster.players[3].team, Some(TeamId::new(0)));
}
