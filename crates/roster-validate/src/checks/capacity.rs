use roster_model::{LeagueConfig, TeamStats};

use crate::issue::Issue;

pub(crate) fn check(stats: &TeamStats, config: &LeagueConfig) -> Option<Issue> {
    (stats.size > config.max_team_size).then_some(Issue::OverCapacity {
        size: stats.size,
        max: config.max_team_size,
    })
}
