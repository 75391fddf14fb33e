//! Error types for ledger operations.

use roster_model::WarningId;
use thiserror::Error;

/// Errors from warning ledger operations.
///
/// A failed lookup leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No warning with this id exists.
    #[error("warning not found: {0}")]
    UnknownWarning(WarningId),
    /// The warning is informational and cannot be resolved or dismissed.
    #[error("warning {0} is informational and has no review state")]
    NotActionable(WarningId),
}
