//! Team assignment: the only code path that changes team membership.
//!
//! A move always carries the player's whole group. All validation happens
//! before the first write, so a refused move leaves the roster untouched and
//! an accepted one is applied completely.

use std::collections::BTreeSet;

use roster_model::{PlayerId, Roster, TeamId};
use roster_validate::{ConflictDescription, ConstraintValidator, Issue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AssignmentError;

/// Outcome of a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    pub allowed: bool,
    /// Players whose team changed.
    pub moved: Vec<PlayerId>,
    pub target: Option<TeamId>,
    /// The pair that blocked the move.
    pub conflict: Option<ConflictDescription>,
    /// Soft issues of the destination after the move.
    pub notices: Vec<Issue>,
    /// Teams whose membership changed, source and destination.
    pub touched_teams: Vec<TeamId>,
}

impl MoveResult {
    fn blocked(target: Option<TeamId>, conflict: Option<ConflictDescription>) -> Self {
        Self {
            allowed: false,
            moved: Vec::new(),
            target,
            conflict,
            notices: Vec::new(),
            touched_teams: Vec::new(),
        }
    }
}

/// A move suggested by an outside planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveProposal {
    pub player: PlayerId,
    #[serde(default)]
    pub source_team: Option<TeamId>,
    #[serde(default)]
    pub target_team: Option<TeamId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ProposalOutcome {
    Applied { result: MoveResult },
    Blocked { result: MoveResult },
    /// The player is no longer on the proposal's source team.
    Stale { current: Option<TeamId> },
    /// The player already sits on the target team.
    AlreadyInPlace,
    Invalid { reason: String },
}

impl ProposalOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied { .. } => "applied",
            Self::Blocked { .. } => "blocked",
            Self::Stale { .. } => "stale",
            Self::AlreadyInPlace => "already-in-place",
            Self::Invalid { .. } => "invalid",
        }
    }
}

/// Applies assignment changes to a roster.
pub struct AssignmentCoordinator<'a> {
    roster: &'a mut Roster,
}

impl<'a> AssignmentCoordinator<'a> {
    pub fn new(roster: &'a mut Roster) -> Self {
        Self { roster }
    }

    /// Move a player, and everyone grouped with it, to `target`.
    ///
    /// `None` sends the unit to the unassigned pool. Unknown ids are errors;
    /// an avoid conflict is a normal result with `allowed: false`.
    pub fn move_player(
        &mut self,
        player: PlayerId,
        target: Option<TeamId>,
    ) -> Result<MoveResult, AssignmentError> {
        let validator = ConstraintValidator::new(self.roster);
        let unit = validator.unit_of(player)?;
        let check = validator.can_move_unit(&unit, target)?;
        if !check.allowed {
            debug!(%player, unit = unit.len(), "move refused");
            return Ok(MoveResult::blocked(target, check.conflict));
        }
        let notices = match target {
            Some(team) => validator.projected_violations(&unit, team)?,
            None => Vec::new(),
        };

        let mut moved = Vec::new();
        let mut touched = BTreeSet::new();
        for id in &unit {
            let Some(source) = self.roster.player(*id).map(|p| p.team) else {
                continue;
            };
            if source == target {
                continue;
            }
            if let Some(team) = source.and_then(|t| self.roster.team_mut(t)) {
                team.members.retain(|m| m != id);
                touched.insert(team.id);
            }
            if let Some(team) = target.and_then(|t| self.roster.team_mut(t)) {
                team.members.push(*id);
                touched.insert(team.id);
            }
            if let Some(record) = self.roster.player_mut(*id) {
                record.team = target;
            }
            moved.push(*id);
        }
        for team in &touched {
            self.roster.refresh_team_stats(*team);
        }

        info!(
            %player,
            moved = moved.len(),
            target = %target.map_or_else(|| "unassigned".to_string(), |t| t.to_string()),
            notices = notices.len(),
            "move applied"
        );
        Ok(MoveResult {
            allowed: true,
            moved,
            target,
            conflict: None,
            notices,
            touched_teams: touched.into_iter().collect(),
        })
    }

    /// Replay suggested moves one by one through [`Self::move_player`].
    ///
    /// Outcomes line up with `proposals`. Later proposals see the effect of
    /// earlier ones, so a proposal for a player already carried along with
    /// its group reports `AlreadyInPlace`.
    pub fn apply_proposals(&mut self, proposals: &[MoveProposal]) -> Vec<ProposalOutcome> {
        let outcomes: Vec<ProposalOutcome> = proposals
            .iter()
            .map(|proposal| self.apply_one(proposal))
            .collect();
        info!(
            proposals = proposals.len(),
            applied = outcomes.iter().filter(|o| o.is_applied()).count(),
            "proposals replayed"
        );
        outcomes
    }

    fn apply_one(&mut self, proposal: &MoveProposal) -> ProposalOutcome {
        let Some(current) = self.roster.player(proposal.player).map(|p| p.team) else {
            return ProposalOutcome::Invalid {
                reason: format!("unknown player {}", proposal.player),
            };
        };
        if current == proposal.target_team {
            return ProposalOutcome::AlreadyInPlace;
        }
        if current != proposal.source_team {
            debug!(player = %proposal.player, "stale proposal skipped");
            return ProposalOutcome::Stale { current };
        }
        match self.move_player(proposal.player, proposal.target_team) {
            Ok(result) if result.allowed => ProposalOutcome::Applied { result },
            Ok(result) => ProposalOutcome::Blocked { result },
            Err(err) => ProposalOutcome::Invalid {
                reason: err.to_string(),
            },
        }
    }

    /// Send every player to the unassigned pool.
    pub fn reset_assignments(&mut self) -> Vec<TeamId> {
        let mut touched = Vec::new();
        for team in &mut self.roster.teams {
            if !team.members.is_empty() {
                team.members.clear();
                touched.push(team.id);
            }
        }
        for player in &mut self.roster.players {
            player.team = None;
        }
        self.roster.refresh_all_stats();
        info!(teams = touched.len(), "assignments reset");
        touched
    }

    /// Add an empty team.
    pub fn create_team(&mut self, name: &str) -> TeamId {
        let id = self.roster.add_team(name.trim());
        info!(team = %id, name = name.trim(), "team created");
        id
    }
}
