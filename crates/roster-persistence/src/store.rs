use roster_core::RosterState;

use crate::error::Result;

/// Where roster state lives between runs.
///
/// `load` returns `Ok(None)` when nothing has been saved yet.
pub trait StateStore {
    fn load(&self) -> Result<Option<RosterState>>;

    fn save(&mut self, state: &RosterState) -> Result<()>;
}

/// Keeps the state in memory. Useful for tests and embedders that persist
/// elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<RosterState>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RosterState) -> Self {
        Self {
            state: Some(state),
            saves: 0,
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<RosterState>> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &RosterState) -> Result<()> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}
