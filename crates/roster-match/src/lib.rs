//! Name matching for teammate requests and the review ledger that records
//! every matching decision.
//!
//! - [`NameMatcher`]: free-text request to canonical name plus confidence tier
//! - [`WarningLedger`]: reviewable outcomes with a pending/accepted/rejected lifecycle
//! - [`ReviewSession`]: cursor over the review queue, driven by pure transitions

#![deny(unsafe_code)]

pub mod error;
pub mod ledger;
pub mod matcher;
pub mod nicknames;
pub mod normalize;
pub mod review;

pub use error::LedgerError;
pub use ledger::{LedgerPolicy, Transition, WarningCounts, WarningLedger};
pub use matcher::{MatchOutcome, MatchThresholds, NameMatcher};
pub use normalize::normalize_name;
pub use review::{ReviewAction, ReviewCommand, ReviewSession, ReviewStep};
