//! League configuration supplied by the host application.

use serde::{Deserialize, Serialize};

/// Capacity and demographic targets for every team in a league.
///
/// Read-only to the engine. All fields default so a partial JSON document
/// is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Soft cap on members per team.
    pub max_team_size: usize,
    /// Soft minimum of `F` players per team.
    pub min_females: usize,
    /// Soft minimum of `M` players per team.
    pub min_males: usize,
    /// When false, a team holding both `M` and `F` players is reported.
    pub allow_mixed: bool,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            max_team_size: 12,
            min_females: 0,
            min_males: 0,
            allow_mixed: true,
        }
    }
}

impl LeagueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_team_size(mut self, size: usize) -> Self {
        self.max_team_size = size;
        self
    }

    #[must_use]
    pub fn with_min_females(mut self, count: usize) -> Self {
        self.min_females = count;
        self
    }

    #[must_use]
    pub fn with_min_males(mut self, count: usize) -> Self {
        self.min_males = count;
        self
    }

    #[must_use]
    pub fn with_allow_mixed(mut self, allow: bool) -> Self {
        self.allow_mixed = allow;
        self
    }
}
