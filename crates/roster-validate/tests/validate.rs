use roster_model::{Gender, LeagueConfig, Player, PlayerId, Roster, TeamId};
use roster_validate::{ConstraintValidator, Issue, Severity};

fn place(roster: &mut Roster, player: PlayerId, team: TeamId) {
    roster.players[player.index()].team = Some(team);
    roster.team_mut(team).unwrap().members.push(player);
    roster.refresh_team_stats(team);
}

fn league() -> Roster {
    let config = LeagueConfig::default()
        .with_max_team_size(2)
        .with_min_females(1)
        .with_allow_mixed(false);
    let mut roster = Roster::new(config);
    let red = roster.add_team("Red");
    let blue = roster.add_team("Blue");
    roster.add_team("Empty");
    let players = [
        Player::new(PlayerId::new(0), "Ann", Gender::F, 6.0).with_avoid_requests(["cal"]),
        Player::new(PlayerId::new(0), "Bea", Gender::F, 5.0),
        Player::new(PlayerId::new(0), "Cal", Gender::M, 7.0),
        Player::new(PlayerId::new(0), "Dev", Gender::M, 4.0),
    ];
    for player in players {
        roster.push_player(player);
    }
    for id in [0, 1, 2] {
        place(&mut roster, PlayerId::new(id), red);
    }
    place(&mut roster, PlayerId::new(3), blue);
    roster
}

#[test]
fn league_report_lists_every_team() {
    let roster = league();
    let report = ConstraintValidator::new(&roster).league_report();
    assert_eq!(report.len(), 3);

    let red = &report[0];
    assert_eq!(red.team_name, "Red");
    assert_eq!(red.hard.len(), 1);
    let codes: Vec<&str> = red.soft.iter().map(Issue::code).collect();
    assert_eq!(codes, vec!["over-capacity", "mixed-gender"]);

    let blue = &report[1];
    assert!(!blue.has_hard());
    assert_eq!(blue.soft, vec![Issue::TooFewFemales { count: 0, min: 1 }]);

    assert!(report[2].is_clean());
}

#[test]
fn soft_issues_never_block() {
    let roster = league();
    let validator = ConstraintValidator::new(&roster);
    let check = validator
        .can_move(PlayerId::new(3), Some(TeamId::new(0)))
        .unwrap();
    assert!(check.allowed);
    let projected = validator
        .projected_violations(&[PlayerId::new(3)], TeamId::new(0))
        .unwrap();
    assert!(projected.iter().all(|issue| issue.severity() == Severity::Soft));
    assert!(projected.contains(&Issue::OverCapacity { size: 4, max: 2 }));
}

#[test]
fn issue_display() {
    let issue = Issue::OverCapacity { size: 3, max: 2 };
    insta::assert_snapshot!(issue.to_string(), @"[soft] team has 3 players, above the maximum of 2");
    let roster = league();
    let report = ConstraintValidator::new(&roster)
        .team_violations(TeamId::new(0))
        .unwrap();
    insta::assert_snapshot!(report.hard[0].to_string(), @"[hard] Ann asked to avoid Cal");
}
