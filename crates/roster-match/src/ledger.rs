//! The warning ledger: reviewable match outcomes with a status lifecycle.
//!
//! Entries are append-only. `resolve` and `dismiss` only move an entry's
//! status, so the ledger doubles as the audit trail of every decision.

use std::collections::BTreeMap;

use roster_model::{
    NewWarning, PlayerId, StructuredWarning, WarningCategory, WarningId, WarningStatus,
};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::matcher::MatchOutcome;
use crate::review::ReviewCommand;

/// Ledger behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerPolicy {
    /// Accept `match-exact` entries as soon as they are recorded.
    pub auto_accept_exact: bool,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            auto_accept_exact: true,
        }
    }
}

/// Status change produced by a review decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub id: WarningId,
    pub previous: WarningStatus,
    pub current: WarningStatus,
    /// False when the decision repeated what was already recorded.
    pub changed: bool,
}

/// Counts over actionable warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WarningCounts {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub by_category: BTreeMap<WarningCategory, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningLedger {
    #[serde(default)]
    entries: Vec<StructuredWarning>,
    #[serde(default)]
    policy: LedgerPolicy,
}

impl WarningLedger {
    pub fn new(policy: LedgerPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// Every entry in creation order, informational ones included.
    pub fn entries(&self) -> &[StructuredWarning] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: WarningId) -> Option<&StructuredWarning> {
        self.entries.get(id.index()).filter(|w| w.id == id)
    }

    /// Append a warning and return its id.
    pub fn record(&mut self, new: NewWarning) -> WarningId {
        let id = WarningId::new(self.entries.len() as u32);
        let mut warning = StructuredWarning::from_new(id, new);
        if self.policy.auto_accept_exact
            && warning.category == WarningCategory::MatchExact
            && warning.is_actionable()
        {
            warning.status = WarningStatus::Accepted;
        }
        tracing::debug!(
            warning = %warning.summary_line(),
            status = %warning.status,
            "recorded warning"
        );
        self.entries.push(warning);
        id
    }

    /// Record the outcome of matching one teammate request.
    pub fn record_match(
        &mut self,
        requester: &str,
        requester_id: PlayerId,
        requested: &str,
        outcome: &MatchOutcome,
    ) -> WarningId {
        self.record(NewWarning {
            category: WarningCategory::for_confidence(outcome.confidence),
            requester: requester.to_string(),
            requester_id: Some(requester_id),
            requested: requested.to_string(),
            matched: outcome.matched.clone(),
            confidence: outcome.confidence,
            reason: outcome.reason.clone(),
        })
    }

    fn actionable_mut(&mut self, id: WarningId) -> Result<&mut StructuredWarning, LedgerError> {
        let Some(warning) = self.entries.get_mut(id.index()).filter(|w| w.id == id) else {
            tracing::warn!(%id, "warning lookup failed");
            return Err(LedgerError::UnknownWarning(id));
        };
        if !warning.is_actionable() {
            return Err(LedgerError::NotActionable(id));
        }
        Ok(warning)
    }

    /// Accept a warning, optionally replacing the suggested canonical name.
    ///
    /// Accepting an already accepted warning without a correction keeps the
    /// earlier correction and reports `changed: false`.
    pub fn resolve(
        &mut self,
        id: WarningId,
        corrected: Option<&str>,
    ) -> Result<Transition, LedgerError> {
        let warning = self.actionable_mut(id)?;
        let previous = warning.status;
        let correction = corrected
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let mut changed = previous != WarningStatus::Accepted;
        if let Some(name) = correction
            && warning.resolution.as_deref() != Some(name.as_str())
        {
            warning.resolution = Some(name);
            changed = true;
        }
        warning.status = WarningStatus::Accepted;
        tracing::debug!(%id, changed, "warning accepted");
        Ok(Transition {
            id,
            previous,
            current: WarningStatus::Accepted,
            changed,
        })
    }

    /// Reject a warning.
    pub fn dismiss(&mut self, id: WarningId) -> Result<Transition, LedgerError> {
        let warning = self.actionable_mut(id)?;
        let previous = warning.status;
        warning.status = WarningStatus::Rejected;
        tracing::debug!(%id, "warning rejected");
        Ok(Transition {
            id,
            previous,
            current: WarningStatus::Rejected,
            changed: previous != WarningStatus::Rejected,
        })
    }

    /// Reject every pending actionable warning. Returns the ids that moved.
    pub fn dismiss_all(&mut self) -> Vec<WarningId> {
        let mut dismissed = Vec::new();
        for warning in &mut self.entries {
            if warning.is_actionable() && warning.is_pending() {
                warning.status = WarningStatus::Rejected;
                dismissed.push(warning.id);
            }
        }
        tracing::info!(count = dismissed.len(), "dismissed pending warnings");
        dismissed
    }

    /// Execute a command produced by a review session.
    pub fn apply(&mut self, command: &ReviewCommand) -> Result<Transition, LedgerError> {
        match command {
            ReviewCommand::Resolve { id, corrected } => self.resolve(*id, corrected.as_deref()),
            ReviewCommand::Dismiss { id } => self.dismiss(*id),
        }
    }

    /// Actionable warnings in review order: `match-review`, then
    /// `match-exact`, then `not-found`; creation order within a category.
    pub fn queue(&self) -> Vec<&StructuredWarning> {
        let mut queue: Vec<&StructuredWarning> =
            self.entries.iter().filter(|w| w.is_actionable()).collect();
        queue.sort_by_key(|w| (w.category.review_rank(), w.id));
        queue
    }

    /// The review queue restricted to pending entries.
    pub fn pending(&self) -> Vec<&StructuredWarning> {
        self.queue().into_iter().filter(|w| w.is_pending()).collect()
    }

    pub fn counts(&self) -> WarningCounts {
        let mut counts = WarningCounts::default();
        for warning in self.entries.iter().filter(|w| w.is_actionable()) {
            counts.total += 1;
            match warning.status {
                WarningStatus::Pending => counts.pending += 1,
                WarningStatus::Accepted => counts.accepted += 1,
                WarningStatus::Rejected => counts.rejected += 1,
            }
            *counts.by_category.entry(warning.category).or_insert(0) += 1;
        }
        counts
    }

    /// Accepted decisions as `(requester, requested text, canonical name)`.
    pub fn accepted_links(&self) -> impl Iterator<Item = (PlayerId, &str, &str)> + '_ {
        self.entries
            .iter()
            .filter(|w| w.is_actionable() && w.status == WarningStatus::Accepted)
            .filter_map(|w| Some((w.requester_id?, w.requested.as_str(), w.effective_match()?)))
    }

    /// Latest actionable decision about one request of one player.
    pub fn decision_for(
        &self,
        requester: PlayerId,
        requested: &str,
    ) -> Option<&StructuredWarning> {
        let requested = requested.trim();
        self.entries.iter().rev().find(|w| {
            w.is_actionable()
                && w.requester_id == Some(requester)
                && w.requested.trim() == requested
        })
    }
}
