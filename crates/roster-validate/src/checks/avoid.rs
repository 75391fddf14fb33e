//! Avoid-request checks (hard).

use roster_model::{Player, TeamId};

use crate::issue::{ConflictDescription, ConflictDirection, Issue};

fn describe(
    mover: &Player,
    blocker: &Player,
    direction: ConflictDirection,
    team: Option<TeamId>,
) -> ConflictDescription {
    ConflictDescription {
        mover: mover.id,
        mover_name: mover.name.clone(),
        blocker: blocker.id,
        blocker_name: blocker.name.clone(),
        direction,
        team,
    }
}

/// First conflict between a moving unit and the destination's members.
///
/// Movers are checked in the order given and members in team order; for each
/// pair the mover's own requests come before the member's.
pub(crate) fn first_conflict(
    unit: &[&Player],
    members: &[&Player],
    team: Option<TeamId>,
) -> Option<ConflictDescription> {
    for mover in unit {
        for member in members {
            if mover.id == member.id {
                continue;
            }
            if mover.avoids(&member.name) {
                return Some(describe(mover, member, ConflictDirection::MoverAvoids, team));
            }
            if member.avoids(&mover.name) {
                return Some(describe(mover, member, ConflictDirection::MemberAvoids, team));
            }
        }
    }
    None
}

/// Every avoid pair already inside one team, reported from the avoider's side.
pub(crate) fn within_team(members: &[&Player], team: TeamId) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, first) in members.iter().enumerate() {
        for second in &members[i + 1..] {
            if first.avoids(&second.name) {
                issues.push(Issue::AvoidConflict(describe(
                    first,
                    second,
                    ConflictDirection::MoverAvoids,
                    Some(team),
                )));
            }
            if second.avoids(&first.name) {
                issues.push(Issue::AvoidConflict(describe(
                    second,
                    first,
                    ConflictDirection::MoverAvoids,
                    Some(team),
                )));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use roster_model::{Gender, PlayerId};

    use super::*;

    fn player(id: u32, name: &str, avoids: &[&str]) -> Player {
        Player::new(PlayerId::new(id), name, Gender::Other, 5.0)
            .with_avoid_requests(avoids.iter().copied())
    }

    #[test]
    fn mover_side_is_checked_first() {
        let ann = player(0, "Ann", &["Bob"]);
        let bob = player(1, "Bob", &["Ann"]);
        let conflict = first_conflict(&[&ann], &[&bob], None).unwrap();
        assert_eq!(conflict.direction, ConflictDirection::MoverAvoids);
        assert_eq!(conflict.blocker_name, "Bob");
    }

    #[test]
    fn member_side_is_detected() {
        let ann = player(0, "Ann", &[]);
        let bob = player(1, "bob", &["  ANN "]);
        let conflict = first_conflict(&[&ann], &[&bob], None).unwrap();
        assert_eq!(conflict.direction, ConflictDirection::MemberAvoids);
        assert_eq!(conflict.message(), "bob asked to avoid Ann");
    }

    #[test]
    fn mutual_avoid_inside_team_reports_both_sides() {
        let ann = player(0, "Ann", &["Bob"]);
        let bob = player(1, "Bob", &["Ann"]);
        let cal = player(2, "Cal", &[]);
        let issues = within_team(&[&ann, &bob, &cal], TeamId::new(0));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(Issue::is_hard));
    }
}
