//! The single state bundle the engine reads and writes.

use roster_match::{LedgerPolicy, WarningLedger};
use roster_model::{LeagueConfig, Roster};
use serde::{Deserialize, Serialize};

/// Roster plus warning ledger.
///
/// Every component may read all of it. The import pipeline and the group
/// resolver write players and groups, the ledger owns warnings, and the
/// assignment coordinator owns team membership.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterState {
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub ledger: WarningLedger,
}

impl RosterState {
    pub fn new(config: LeagueConfig, policy: LedgerPolicy) -> Self {
        Self {
            roster: Roster::new(config),
            ledger: WarningLedger::new(policy),
        }
    }
}
