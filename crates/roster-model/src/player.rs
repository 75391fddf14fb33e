//! Player records and the value types attached to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::ids::{GroupId, PlayerId, TeamId};

/// Lowest accepted skill rating.
pub const MIN_SKILL: f32 = 1.0;
/// Highest accepted skill rating.
pub const MAX_SKILL: f32 = 10.0;
/// Rating used when the imported value is missing or unreadable.
pub const DEFAULT_SKILL: f32 = 5.0;

/// Player gender as recorded on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    #[default]
    Other,
}

impl Gender {
    /// Parse a gender from free text.
    ///
    /// Recognizes the usual spellings of male and female and the explicit
    /// "other"/"nonbinary" markers. Returns `None` for anything else so the
    /// caller can decide how to default.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "m" | "male" | "man" | "men" | "mmp" => Some(Self::M),
            "f" | "female" | "woman" | "women" | "fmp" | "w" => Some(Self::F),
            "o" | "other" | "x" | "nb" | "nonbinary" | "non-binary" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::InvalidGender(s.to_string()))
    }
}

/// Parse a skill rating, clamping readable values into `MIN_SKILL..=MAX_SKILL`.
///
/// Blank, non-numeric and non-finite input is an error; the import pipeline
/// turns that into [`DEFAULT_SKILL`].
pub fn parse_skill(raw: &str) -> Result<f32, ModelError> {
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| ModelError::InvalidSkill(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ModelError::InvalidSkill(raw.to_string()));
    }
    Ok(value.clamp(MIN_SKILL, MAX_SKILL))
}

/// Canonical comparison key for a person's name: trimmed, lowercased, with
/// runs of whitespace collapsed to one space.
pub fn name_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive name equality used by the avoid rule and roster lookups.
pub fn names_equal(a: &str, b: &str) -> bool {
    let a = name_key(a);
    !a.is_empty() && a == name_key(b)
}

/// A rostered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub gender: Gender,
    pub skill: f32,
    #[serde(default)]
    pub skill_override: Option<f32>,
    /// Teammate requests exactly as typed, in order.
    #[serde(default)]
    pub teammate_requests: Vec<String>,
    /// Avoid requests exactly as typed, in order.
    #[serde(default)]
    pub avoid_requests: Vec<String>,
    #[serde(default)]
    pub team: Option<TeamId>,
    #[serde(default)]
    pub group: Option<GroupId>,
    #[serde(default)]
    pub handler: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, gender: Gender, skill: f32) -> Self {
        Self {
            id,
            name: name.into(),
            gender,
            skill: skill.clamp(MIN_SKILL, MAX_SKILL),
            skill_override: None,
            teammate_requests: Vec::new(),
            avoid_requests: Vec::new(),
            team: None,
            group: None,
            handler: false,
        }
    }

    #[must_use]
    pub fn with_teammate_requests<I, S>(mut self, requests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teammate_requests = requests.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_avoid_requests<I, S>(mut self, requests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avoid_requests = requests.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_skill_override(mut self, rating: Option<f32>) -> Self {
        self.skill_override = rating.map(|r| r.clamp(MIN_SKILL, MAX_SKILL));
        self
    }

    #[must_use]
    pub fn with_handler(mut self, handler: bool) -> Self {
        self.handler = handler;
        self
    }

    /// Rating used for balancing: the override when present.
    pub fn effective_skill(&self) -> f32 {
        self.skill_override.unwrap_or(self.skill)
    }

    /// True when one of this player's avoid requests names `other`.
    pub fn avoids(&self, other: &str) -> bool {
        self.avoid_requests.iter().any(|req| names_equal(req, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parsing_is_lenient() {
        assert_eq!(Gender::parse(" Female "), Some(Gender::F));
        assert_eq!(Gender::parse("m"), Some(Gender::M));
        assert_eq!(Gender::parse("NB"), Some(Gender::Other));
        assert_eq!(Gender::parse("?"), None);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn skill_is_clamped() {
        assert_eq!(parse_skill("12").unwrap(), MAX_SKILL);
        assert_eq!(parse_skill("0").unwrap(), MIN_SKILL);
        assert_eq!(parse_skill(" 7.5 ").unwrap(), 7.5);
        assert!(parse_skill("seven").is_err());
        assert!(parse_skill("NaN").is_err());
    }

    #[test]
    fn avoid_matching_ignores_case_and_spacing() {
        let player = Player::new(PlayerId::new(0), "Ann", Gender::F, 6.0)
            .with_avoid_requests(["  bob   SMITH "]);
        assert!(player.avoids("Bob Smith"));
        assert!(!player.avoids("Bob"));
    }

    #[test]
    fn override_wins_for_effective_skill() {
        let player =
            Player::new(PlayerId::new(0), "Ann", Gender::F, 6.0).with_skill_override(Some(8.0));
        assert_eq!(player.effective_skill(), 8.0);
    }
}
