//! One entry point over the state bundle.
//!
//! [`RosterEngine`] sequences the components: review decisions and imports
//! are followed by a group recompute, and every assignment change goes
//! through the coordinator.

use roster_match::{
    LedgerPolicy, MatchThresholds, NameMatcher, ReviewCommand, ReviewSession, Transition,
    WarningCounts,
};
use roster_model::{
    GroupId, LeagueConfig, PlayerGroup, PlayerId, StructuredWarning, TeamId, TeamStats,
    WarningId,
};
use roster_validate::{ConstraintValidator, MoveCheck, TeamViolations};
use serde::{Deserialize, Serialize};

use crate::coordinator::{AssignmentCoordinator, MoveProposal, MoveResult, ProposalOutcome};
use crate::error::EngineError;
use crate::groups::{GroupResolver, ResolveReport};
use crate::import::{ImportReport, RawPlayer, import};
use crate::state::RosterState;

/// Matching and review settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub thresholds: MatchThresholds,
    pub ledger: LedgerPolicy,
}

impl EngineOptions {
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: MatchThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_ledger_policy(mut self, policy: LedgerPolicy) -> Self {
        self.ledger = policy;
        self
    }
}

/// Everything an import produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub import: ImportReport,
    pub grouping: ResolveReport,
}

#[derive(Debug, Clone)]
pub struct RosterEngine {
    state: RosterState,
    matcher: NameMatcher,
    resolver: GroupResolver,
}

impl RosterEngine {
    pub fn new(config: LeagueConfig, options: EngineOptions) -> Self {
        Self::from_state(RosterState::new(config, options.ledger), options)
    }

    /// Wrap a loaded state. Groups and team statistics are recomputed so a
    /// hand-edited or older file cannot carry stale derived data.
    pub fn from_state(mut state: RosterState, options: EngineOptions) -> Self {
        let resolver = GroupResolver::new();
        resolver.recompute(&mut state.roster, &state.ledger);
        state.roster.refresh_all_stats();
        Self {
            state,
            matcher: NameMatcher::new(options.thresholds),
            resolver,
        }
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn into_state(self) -> RosterState {
        self.state
    }

    pub fn import(&mut self, rows: Vec<RawPlayer>) -> ImportOutcome {
        let report = import(&mut self.state, rows, &self.matcher);
        let grouping = self.recompute_groups();
        ImportOutcome {
            import: report,
            grouping,
        }
    }

    // Review

    pub fn review_queue(&self) -> Vec<&StructuredWarning> {
        self.state.ledger.queue()
    }

    pub fn warning_counts(&self) -> WarningCounts {
        self.state.ledger.counts()
    }

    pub fn review_session(&self) -> ReviewSession {
        ReviewSession::open(&self.state.ledger)
    }

    pub fn resolve(
        &mut self,
        id: WarningId,
        corrected: Option<&str>,
    ) -> Result<(Transition, ResolveReport), EngineError> {
        let transition = self.state.ledger.resolve(id, corrected)?;
        Ok((transition, self.recompute_groups()))
    }

    pub fn dismiss(&mut self, id: WarningId) -> Result<(Transition, ResolveReport), EngineError> {
        let transition = self.state.ledger.dismiss(id)?;
        Ok((transition, self.recompute_groups()))
    }

    pub fn dismiss_all(&mut self) -> (Vec<WarningId>, ResolveReport) {
        let dismissed = self.state.ledger.dismiss_all();
        (dismissed, self.recompute_groups())
    }

    /// Execute a command produced by a [`ReviewSession`].
    pub fn apply_review(
        &mut self,
        command: &ReviewCommand,
    ) -> Result<(Transition, ResolveReport), EngineError> {
        let transition = self.state.ledger.apply(command)?;
        Ok((transition, self.recompute_groups()))
    }

    // Groups

    pub fn recompute_groups(&mut self) -> ResolveReport {
        self.resolver
            .recompute(&mut self.state.roster, &self.state.ledger)
    }

    pub fn groups(&self) -> impl Iterator<Item = &PlayerGroup> {
        self.state.roster.groups.values()
    }

    pub fn group_of(&self, player: PlayerId) -> Option<&PlayerGroup> {
        self.resolver.group_of(&self.state.roster, player)
    }

    pub fn merge_groups(
        &mut self,
        first: GroupId,
        second: GroupId,
    ) -> Result<GroupId, EngineError> {
        Ok(self
            .resolver
            .merge(&mut self.state.roster, &self.state.ledger, first, second)?)
    }

    pub fn dissolve_group(&mut self, id: GroupId) -> Result<PlayerGroup, EngineError> {
        Ok(self.resolver.dissolve(&mut self.state.roster, id)?)
    }

    // Assignment

    pub fn can_move(
        &self,
        player: PlayerId,
        target: Option<TeamId>,
    ) -> Result<MoveCheck, EngineError> {
        Ok(ConstraintValidator::new(&self.state.roster).can_move(player, target)?)
    }

    pub fn move_player(
        &mut self,
        player: PlayerId,
        target: Option<TeamId>,
    ) -> Result<MoveResult, EngineError> {
        Ok(AssignmentCoordinator::new(&mut self.state.roster).move_player(player, target)?)
    }

    pub fn apply_proposals(&mut self, proposals: &[MoveProposal]) -> Vec<ProposalOutcome> {
        AssignmentCoordinator::new(&mut self.state.roster).apply_proposals(proposals)
    }

    pub fn reset_assignments(&mut self) -> Vec<TeamId> {
        AssignmentCoordinator::new(&mut self.state.roster).reset_assignments()
    }

    pub fn create_team(&mut self, name: &str) -> TeamId {
        AssignmentCoordinator::new(&mut self.state.roster).create_team(name)
    }

    // Reporting

    pub fn team_stats(&self, team: TeamId) -> Option<&TeamStats> {
        self.state.roster.team(team).map(|t| &t.stats)
    }

    pub fn team_violations(&self, team: TeamId) -> Result<TeamViolations, EngineError> {
        Ok(ConstraintValidator::new(&self.state.roster).team_violations(team)?)
    }

    pub fn league_report(&self) -> Vec<TeamViolations> {
        ConstraintValidator::new(&self.state.roster).league_report()
    }
}
