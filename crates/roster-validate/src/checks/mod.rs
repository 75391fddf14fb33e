//! Constraint check modules.
//!
//! `avoid` holds the only hard rule; the others produce advisory issues.

pub(crate) mod avoid;
mod capacity;
mod demographics;

use roster_model::{LeagueConfig, TeamStats};

use crate::issue::Issue;

/// Run every soft check against a team's aggregates.
pub(crate) fn soft_issues(stats: &TeamStats, config: &LeagueConfig) -> Vec<Issue> {
    let mut issues = Vec::new();

    // 1. Capacity
    if let Some(issue) = capacity::check(stats, config) {
        issues.push(issue);
    }

    // 2. Gender minimums and mixed teams
    issues.extend(demographics::check(stats, config));

    issues
}
