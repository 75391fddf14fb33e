//! Error types for engine operations.
//!
//! Rule violations are not errors: a blocked move comes back as a
//! [`crate::MoveResult`] with `allowed: false`. These types cover lookups of
//! ids that do not exist and refused group edits.

use roster_match::LedgerError;
use roster_model::{GroupId, ModelError};
use thiserror::Error;

/// Errors from explicit group edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The combined group would exceed the size cap. Nothing was changed.
    #[error("merging {first} ({first_size} players) with {second} ({second_size} players) would exceed {max}")]
    MergeTooLarge {
        first: GroupId,
        second: GroupId,
        first_size: usize,
        second_size: usize,
        max: usize,
    },

    #[error("cannot merge group {0} with itself")]
    SameGroup(GroupId),

    /// No mutual request links the two groups.
    #[error("groups {first} and {second} share no mutual request")]
    NotLinked { first: GroupId, second: GroupId },
}

/// Errors from assignment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Any failure surfaced by [`crate::RosterEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
