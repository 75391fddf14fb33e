//! Constraint issue types.
//!
//! Each variant carries only the data its message needs. Severity is fixed
//! per variant: avoid conflicts block a move, everything else is advisory.

use std::fmt;

use roster_model::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks the move outright.
    Hard,
    /// Reported for display; never blocks.
    Soft,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Soft => "soft",
        }
    }
}

/// Which side of a pair stated the avoid request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictDirection {
    /// The moving player avoids a member of the destination.
    MoverAvoids,
    /// A member of the destination avoids the moving player.
    MemberAvoids,
}

/// The specific pair that blocks a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDescription {
    pub mover: PlayerId,
    pub mover_name: String,
    pub blocker: PlayerId,
    pub blocker_name: String,
    pub direction: ConflictDirection,
    pub team: Option<TeamId>,
}

impl ConflictDescription {
    pub fn message(&self) -> String {
        match self.direction {
            ConflictDirection::MoverAvoids => {
                format!("{} asked to avoid {}", self.mover_name, self.blocker_name)
            }
            ConflictDirection::MemberAvoids => {
                format!("{} asked to avoid {}", self.blocker_name, self.mover_name)
            }
        }
    }
}

impl fmt::Display for ConflictDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Constraint issue - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issue {
    /// Two players on the same team where one asked to avoid the other.
    AvoidConflict(ConflictDescription),
    /// Team has more members than `max_team_size`.
    OverCapacity { size: usize, max: usize },
    TooFewFemales { count: usize, min: usize },
    TooFewMales { count: usize, min: usize },
    /// Team mixes `M` and `F` players while the league forbids it.
    MixedGenderNotAllowed { females: usize, males: usize },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::AvoidConflict(_) => Severity::Hard,
            Issue::OverCapacity { .. }
            | Issue::TooFewFemales { .. }
            | Issue::TooFewMales { .. }
            | Issue::MixedGenderNotAllowed { .. } => Severity::Soft,
        }
    }

    /// Stable short code for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            Issue::AvoidConflict(_) => "avoid-conflict",
            Issue::OverCapacity { .. } => "over-capacity",
            Issue::TooFewFemales { .. } => "too-few-females",
            Issue::TooFewMales { .. } => "too-few-males",
            Issue::MixedGenderNotAllowed { .. } => "mixed-gender",
        }
    }

    pub fn is_hard(&self) -> bool {
        self.severity() == Severity::Hard
    }

    pub fn message(&self) -> String {
        match self {
            Issue::AvoidConflict(conflict) => conflict.message(),
            Issue::OverCapacity { size, max } => {
                format!("team has {size} players, above the maximum of {max}")
            }
            Issue::TooFewFemales { count, min } => {
                format!("team has {count} female players, below the minimum of {min}")
            }
            Issue::TooFewMales { count, min } => {
                format!("team has {count} male players, below the minimum of {min}")
            }
            Issue::MixedGenderNotAllowed { females, males } => format!(
                "team mixes {females} female and {males} male players; \
                 mixed teams are not allowed"
            ),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity().label(), self.message())
    }
}

/// Issues attached to one team, split by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamViolations {
    pub team: Option<TeamId>,
    pub team_name: String,
    pub hard: Vec<Issue>,
    pub soft: Vec<Issue>,
}

impl TeamViolations {
    pub fn new(team: TeamId, team_name: &str) -> Self {
        Self {
            team: Some(team),
            team_name: team_name.to_string(),
            ..Self::default()
        }
    }

    pub fn add(&mut self, issue: Issue) {
        match issue.severity() {
            Severity::Hard => self.hard.push(issue),
            Severity::Soft => self.soft.push(issue),
        }
    }

    pub fn has_hard(&self) -> bool {
        !self.hard.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.hard.is_empty() && self.soft.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.hard.len() + self.soft.len()
    }

    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.hard.iter().chain(self.soft.iter())
    }
}
