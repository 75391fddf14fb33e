//! Constraint validation for team assignment.
//!
//! Avoid requests are hard constraints and block a move; capacity and gender
//! targets are soft and only reported.

#![deny(unsafe_code)]

mod checks;
pub mod issue;
pub mod validator;

pub use issue::{ConflictDescription, ConflictDirection, Issue, Severity, TeamViolations};
pub use validator::{ConstraintValidator, MoveCheck};
