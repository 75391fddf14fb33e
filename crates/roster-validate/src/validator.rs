//! Move legality and team violation reports over a roster snapshot.

use std::collections::BTreeSet;

use roster_model::{ModelError, Player, PlayerId, Roster, TeamId, TeamStats};
use serde::Serialize;

use crate::checks::{self, avoid};
use crate::issue::{ConflictDescription, Issue, TeamViolations};

/// Outcome of a legality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveCheck {
    pub allowed: bool,
    pub conflict: Option<ConflictDescription>,
}

impl MoveCheck {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            conflict: None,
        }
    }

    pub fn blocked(conflict: ConflictDescription) -> Self {
        Self {
            allowed: false,
            conflict: Some(conflict),
        }
    }
}

/// Read-only rule evaluation over a roster.
///
/// The validator never mutates; the assignment coordinator asks it before
/// committing a move.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintValidator<'a> {
    roster: &'a Roster,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// The players that move together with `player`: its group, or itself.
    pub fn unit_of(&self, player: PlayerId) -> Result<Vec<PlayerId>, ModelError> {
        self.roster.require_player(player)?;
        Ok(match self.roster.group_of(player) {
            Some(group) => group.members.iter().copied().collect(),
            None => vec![player],
        })
    }

    /// Whether `player` (with its whole group) may move to `target`.
    pub fn can_move(
        &self,
        player: PlayerId,
        target: Option<TeamId>,
    ) -> Result<MoveCheck, ModelError> {
        let unit = self.unit_of(player)?;
        self.can_move_unit(&unit, target)
    }

    /// Hard check for an explicit set of co-moving players.
    ///
    /// Moving to `None` (the unassigned pool) is always allowed.
    pub fn can_move_unit(
        &self,
        unit: &[PlayerId],
        target: Option<TeamId>,
    ) -> Result<MoveCheck, ModelError> {
        let movers = self.resolve(unit)?;
        let Some(team) = target else {
            return Ok(MoveCheck::allowed());
        };
        let members = self.staying_members(team, unit)?;
        match avoid::first_conflict(&movers, &members, Some(team)) {
            Some(conflict) => {
                tracing::debug!(
                    mover = %conflict.mover,
                    blocker = %conflict.blocker,
                    team = %team,
                    "move blocked by avoid request"
                );
                Ok(MoveCheck::blocked(conflict))
            }
            None => Ok(MoveCheck::allowed()),
        }
    }

    /// Current hard and soft issues of one team.
    pub fn team_violations(&self, team: TeamId) -> Result<TeamViolations, ModelError> {
        let record = self.roster.require_team(team)?;
        let members = self.roster.team_members(team);
        let mut report = TeamViolations::new(team, &record.name);
        for issue in avoid::within_team(&members, team) {
            report.add(issue);
        }
        let stats = TeamStats::compute(members.iter().copied());
        for issue in checks::soft_issues(&stats, &self.roster.config) {
            report.add(issue);
        }
        Ok(report)
    }

    /// Soft issues `target` would have after `unit` joins it.
    pub fn projected_violations(
        &self,
        unit: &[PlayerId],
        target: TeamId,
    ) -> Result<Vec<Issue>, ModelError> {
        let movers = self.resolve(unit)?;
        let members = self.staying_members(target, unit)?;
        let stats = TeamStats::compute(members.into_iter().chain(movers));
        Ok(checks::soft_issues(&stats, &self.roster.config))
    }

    /// Violations for every team, in team order.
    pub fn league_report(&self) -> Vec<TeamViolations> {
        self.roster
            .teams
            .iter()
            .filter_map(|team| self.team_violations(team.id).ok())
            .collect()
    }

    fn resolve(&self, unit: &[PlayerId]) -> Result<Vec<&'a Player>, ModelError> {
        unit.iter()
            .map(|id| self.roster.require_player(*id))
            .collect()
    }

    /// Members of `team` that are not part of the moving unit.
    fn staying_members(
        &self,
        team: TeamId,
        unit: &[PlayerId],
    ) -> Result<Vec<&'a Player>, ModelError> {
        self.roster.require_team(team)?;
        let moving: BTreeSet<PlayerId> = unit.iter().copied().collect();
        Ok(self
            .roster
            .team_members(team)
            .into_iter()
            .filter(|p| !moving.contains(&p.id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use roster_model::{Gender, LeagueConfig, PlayerGroup};

    use super::*;
    use crate::issue::ConflictDirection;

    fn roster() -> (Roster, TeamId) {
        let mut roster = Roster::new(LeagueConfig::default().with_max_team_size(2));
        let team = roster.add_team("Red");
        for (name, avoids) in [("Ann", vec!["Bob"]), ("Bob", vec![]), ("Cal", vec![])] {
            roster.push_player(
                Player::new(PlayerId::new(0), name, Gender::F, 5.0).with_avoid_requests(avoids),
            );
        }
        let bob = PlayerId::new(1);
        roster.players[bob.index()].team = Some(team);
        roster.team_mut(team).unwrap().members.push(bob);
        (roster, team)
    }

    #[test]
    fn avoid_conflict_blocks() {
        let (roster, team) = roster();
        let check = ConstraintValidator::new(&roster)
            .can_move(PlayerId::new(0), Some(team))
            .unwrap();
        assert!(!check.allowed);
        let conflict = check.conflict.unwrap();
        assert_eq!(conflict.blocker_name, "Bob");
        assert_eq!(conflict.direction, ConflictDirection::MoverAvoids);
    }

    #[test]
    fn unassigned_pool_is_always_allowed() {
        let (roster, _) = roster();
        let check = ConstraintValidator::new(&roster)
            .can_move(PlayerId::new(0), None)
            .unwrap();
        assert_eq!(check, MoveCheck::allowed());
    }

    #[test]
    fn group_member_conflict_blocks_whole_unit() {
        let (mut roster, team) = roster();
        let gid = roster.allocate_group_id();
        let members = BTreeSet::from([PlayerId::new(0), PlayerId::new(2)]);
        roster.groups.insert(gid, PlayerGroup::new(gid, 0, members));
        roster.players[0].group = Some(gid);
        roster.players[2].group = Some(gid);

        let check = ConstraintValidator::new(&roster)
            .can_move(PlayerId::new(2), Some(team))
            .unwrap();
        assert!(!check.allowed);
        assert_eq!(check.conflict.unwrap().mover, PlayerId::new(0));
    }

    #[test]
    fn projection_counts_movers() {
        let (roster, team) = roster();
        let validator = ConstraintValidator::new(&roster);
        let issues = validator
            .projected_violations(&[PlayerId::new(0), PlayerId::new(2)], team)
            .unwrap();
        assert_eq!(issues, vec![Issue::OverCapacity { size: 3, max: 2 }]);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (roster, team) = roster();
        let validator = ConstraintValidator::new(&roster);
        assert_eq!(
            validator.can_move(PlayerId::new(9), Some(team)),
            Err(ModelError::UnknownPlayer(PlayerId::new(9)))
        );
        assert_eq!(
            validator.can_move(PlayerId::new(1), Some(TeamId::new(4))),
            Err(ModelError::UnknownTeam(TeamId::new(4)))
        );
    }
}
