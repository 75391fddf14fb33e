//! Roster reconciliation and grouping engine.
//!
//! Raw rows are imported and their teammate requests matched into the
//! warning ledger; the group resolver clusters mutual requests; the
//! assignment coordinator moves players (always with their group) after the
//! constraint validator approves.

#![deny(unsafe_code)]

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod groups;
pub mod import;
pub mod state;

pub use coordinator::{AssignmentCoordinator, MoveProposal, MoveResult, ProposalOutcome};
pub use engine::{EngineOptions, ImportOutcome, RosterEngine};
pub use error::{AssignmentError, EngineError, GroupError};
pub use groups::{GroupResolver, OversizedCluster, ResolveReport};
pub use import::{ImportReport, RawPlayer, import, split_requests};
pub use state::RosterState;
