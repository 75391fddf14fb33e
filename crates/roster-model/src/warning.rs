//! Import-time warnings and their review lifecycle.
//!
//! Every teammate request that goes through name matching leaves one
//! [`StructuredWarning`] behind. Warnings are never deleted; reviewers move
//! them from `Pending` to `Accepted` or `Rejected`, and the ledger keeps the
//! full history as an audit trail.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{PlayerId, WarningId};

/// Categorical certainty of a proposed name match.
///
/// Ordered from weakest to strongest so tiers compare naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
    Exact,
}

impl Confidence {
    /// One tier weaker; `None` stays `None`.
    #[must_use]
    pub fn downgrade(self) -> Self {
        match self {
            Self::Exact => Self::High,
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low | Self::None => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningCategory {
    /// Informational note, never reviewed or counted.
    Info,
    MatchExact,
    MatchReview,
    NotFound,
}

impl WarningCategory {
    /// Category for a matcher outcome.
    pub fn for_confidence(confidence: Confidence) -> Self {
        match confidence {
            Confidence::Exact => Self::MatchExact,
            Confidence::High | Confidence::Medium | Confidence::Low => Self::MatchReview,
            Confidence::None => Self::NotFound,
        }
    }

    /// Position in the review queue; lower is reviewed first.
    pub fn review_rank(&self) -> u8 {
        match self {
            Self::MatchReview => 0,
            Self::MatchExact => 1,
            Self::NotFound => 2,
            Self::Info => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::MatchExact => "match-exact",
            Self::MatchReview => "match-review",
            Self::NotFound => "not-found",
        }
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningStatus {
    Pending,
    Accepted,
    Rejected,
}

impl WarningStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WarningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning content before the ledger assigns an id and status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWarning {
    pub category: WarningCategory,
    pub requester: String,
    pub requester_id: Option<PlayerId>,
    pub requested: String,
    pub matched: Option<String>,
    pub confidence: Confidence,
    pub reason: String,
}

impl NewWarning {
    /// An informational note about a player, e.g. a defaulted field.
    pub fn info(
        requester: &str,
        requester_id: Option<PlayerId>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            category: WarningCategory::Info,
            requester: requester.to_string(),
            requester_id,
            requested: String::new(),
            matched: None,
            confidence: Confidence::None,
            reason: reason.into(),
        }
    }
}

/// A reviewable record of one name-matching outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredWarning {
    pub id: WarningId,
    pub category: WarningCategory,
    /// Display name of the requesting player.
    pub requester: String,
    #[serde(default)]
    pub requester_id: Option<PlayerId>,
    /// Requested text exactly as typed.
    pub requested: String,
    /// Canonical name proposed by the matcher.
    pub matched: Option<String>,
    pub confidence: Confidence,
    pub reason: String,
    pub status: WarningStatus,
    /// Canonical name supplied by the reviewer, overriding `matched`.
    #[serde(default)]
    pub resolution: Option<String>,
}

impl StructuredWarning {
    pub fn from_new(id: WarningId, new: NewWarning) -> Self {
        Self {
            id,
            category: new.category,
            requester: new.requester,
            requester_id: new.requester_id,
            requested: new.requested,
            matched: new.matched,
            confidence: new.confidence,
            reason: new.reason,
            status: WarningStatus::Pending,
            resolution: None,
        }
    }

    /// Reviewable warnings: not `Info`, and tied to a known player.
    pub fn is_actionable(&self) -> bool {
        self.category != WarningCategory::Info && self.requester_id.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.status == WarningStatus::Pending
    }

    /// The reviewer's correction if any, else the matcher's suggestion.
    pub fn effective_match(&self) -> Option<&str> {
        self.resolution.as_deref().or(self.matched.as_deref())
    }

    /// One-line description for logs and terminal output.
    pub fn summary_line(&self) -> String {
        let target = self.effective_match().unwrap_or("?");
        format!(
            "{} [{}] {} requested {:?} -> {} ({})",
            self.id, self.category, self.requester, self.requested, target, self.confidence
        )
    }
}
