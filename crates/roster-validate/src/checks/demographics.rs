//! Gender minimums and the mixed-team rule (soft).

use roster_model::{LeagueConfig, TeamStats};

use crate::issue::Issue;

/// Demographic issues for a team. Empty teams are not checked.
pub(crate) fn check(stats: &TeamStats, config: &LeagueConfig) -> Vec<Issue> {
    let mut issues = Vec::new();
    if stats.size == 0 {
        return issues;
    }
    if stats.females < config.min_females {
        issues.push(Issue::TooFewFemales {
            count: stats.females,
            min: config.min_females,
        });
    }
    if stats.males < config.min_males {
        issues.push(Issue::TooFewMales {
            count: stats.males,
            min: config.min_males,
        });
    }
    if !config.allow_mixed && stats.females > 0 && stats.males > 0 {
        issues.push(Issue::MixedGenderNotAllowed {
            females: stats.females,
            males: stats.males,
        });
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(females: usize, males: usize) -> TeamStats {
        TeamStats {
            size: females + males,
            females,
            males,
            ..TeamStats::default()
        }
    }

    #[test]
    fn minimums_are_reported() {
        let config = LeagueConfig::default().with_min_females(2).with_min_males(1);
        let issues = check(&stats(1, 0), &config);
        assert_eq!(
            issues,
            vec![
                Issue::TooFewFemales { count: 1, min: 2 },
                Issue::TooFewMales { count: 0, min: 1 },
            ]
        );
    }

    #[test]
    fn mixed_teams_only_flagged_when_forbidden() {
        assert!(check(&stats(2, 2), &LeagueConfig::default()).is_empty());
        let strict = LeagueConfig::default().with_allow_mixed(false);
        assert_eq!(
            check(&stats(2, 1), &strict),
            vec![Issue::MixedGenderNotAllowed {
                females: 2,
                males: 1
            }]
        );
    }

    #[test]
    fn empty_team_is_skipped() {
        let config = LeagueConfig::default().with_min_females(3);
        assert!(check(&TeamStats::default(), &config).is_empty());
    }
}
