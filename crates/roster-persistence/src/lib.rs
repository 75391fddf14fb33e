//! Storage for roster state.
//!
//! The engine works on an in-memory [`RosterState`](roster_core::RosterState);
//! this crate is the collaborator that loads and saves it.
//!
//! # File Format
//!
//! State files are pretty-printed JSON wrapped in a versioned envelope:
//!
//! ```text
//! {
//!   "schema_version": 1,
//!   "saved_at": "2026-03-01T18:22:05.120Z",
//!   "state": { "roster": { ... }, "ledger": { ... } }
//! }
//! ```
//!
//! Writes go to a temp file that is renamed over the target, so a crash
//! mid-save leaves the previous file intact.

mod error;
mod file;
mod store;

pub use error::{PersistenceError, Result};
pub use file::{CURRENT_SCHEMA_VERSION, JsonFileStore, StateFile};
pub use store::{MemoryStore, StateStore};
