//! Tests for roster-model types.

use std::collections::BTreeSet;

use roster_model::{
    Gender, LeagueConfig, Player, PlayerGroup, PlayerId, Roster, TeamStats,
};

#[test]
fn league_config_fills_missing_fields() {
    let config: LeagueConfig = serde_json::from_str(r#"{ "max_team_size": 8 }"#).unwrap();
    assert_eq!(config.max_team_size, 8);
    assert_eq!(config.min_females, 0);
    assert!(config.allow_mixed);
}

#[test]
fn roster_with_groups_survives_json() {
    let mut roster = Roster::new(LeagueConfig::default().with_min_females(2));
    let a = roster.push_player(Player::new(PlayerId::new(0), "Ann", Gender::F, 6.0));
    let b = roster.push_player(Player::new(PlayerId::new(0), "Bea", Gender::F, 4.0));
    let gid = roster.allocate_group_id();
    roster
        .groups
        .insert(gid, PlayerGroup::new(gid, 0, BTreeSet::from([a, b])));

    let json = serde_json::to_string(&roster).expect("serialize roster");
    let back: Roster = serde_json::from_str(&json).expect("deserialize roster");

    assert_eq!(back.groups.len(), 1);
    assert_eq!(back.groups[&gid].label, "A");
    assert_eq!(back.config.min_females, 2);
    // The id counter is persisted, so the next group never collides.
    let mut back = back;
    assert_ne!(back.allocate_group_id(), gid);
}

#[test]
fn team_stats_of_empty_team_are_zero() {
    let stats = TeamStats::compute(std::iter::empty());
    assert_eq!(stats, TeamStats::default());
}

#[test]
fn handlers_are_counted() {
    let players = [
        Player::new(PlayerId::new(0), "Ann", Gender::F, 6.0).with_handler(true),
        Player::new(PlayerId::new(1), "Cal", Gender::M, 8.0),
        Player::new(PlayerId::new(2), "Dee", Gender::Other, 4.0).with_handler(true),
    ];
    let stats = TeamStats::compute(players.iter());
    assert_eq!(stats.handlers, 2);
    assert_eq!(stats.others, 1);
    assert!((stats.average_skill - 6.0).abs() < 1e-6);
}
