//! Matching of free-text name requests to canonical roster names.
//!
//! Rules are tried in priority order and the first one that fires wins:
//!
//! 1. Case-insensitive exact equality -> `Exact`
//! 2. Nickname table (`Bob` -> `Robert`) -> `High`
//! 3. Concatenated names (`chrissmith`, `chriss`, `csmith`) -> `High`
//! 4. Jaro-Winkler / Levenshtein similarity above the high or medium
//!    threshold, or a phonetic match above the floor -> `High` / `Medium`
//! 5. Token subset, initials or substring -> `Medium`
//! 6. Similarity above the floor -> `Low`, otherwise `None`
//!
//! When several candidates tie on the winning rule, the alphabetically first
//! is proposed with confidence downgraded one tier so the ambiguity lands in
//! review instead of being decided silently.

use std::cmp::Ordering;

use rapidfuzz::distance::{jaro_winkler, levenshtein};
use roster_model::{Confidence, Player, PlayerId};
use serde::{Deserialize, Serialize};

use crate::nicknames::is_nickname_of;
use crate::normalize::{compact, initials, normalize_name, phonetic_key};

const NICKNAME_SCORE: f64 = 0.95;
const CONCATENATED_SCORE: f64 = 0.95;
const PARTIAL_SCORE: f64 = 0.80;
/// Shortest request considered for substring matches.
const SUBSTRING_MIN_LEN: usize = 4;

/// Similarity boundaries between confidence tiers.
///
/// - At or above `high`: [`Confidence::High`]
/// - `medium` to `high`: [`Confidence::Medium`]
/// - `floor` to `medium`: [`Confidence::Low`] (or `Medium` with a phonetic match)
/// - Below `floor`: no match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    pub high: f64,
    pub medium: f64,
    pub floor: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            high: 0.93,
            medium: 0.85,
            floor: 0.75,
        }
    }
}

impl MatchThresholds {
    #[must_use]
    pub fn strict() -> Self {
        Self {
            high: 0.96,
            medium: 0.90,
            floor: 0.80,
        }
    }

    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            high: 0.90,
            medium: 0.80,
            floor: 0.65,
        }
    }

    /// Tier for a similarity score.
    pub fn categorize(&self, score: f64) -> Confidence {
        if score >= self.high {
            Confidence::High
        } else if score >= self.medium {
            Confidence::Medium
        } else if score >= self.floor {
            Confidence::Low
        } else {
            Confidence::None
        }
    }
}

/// Result of matching one request against the candidate names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Proposed canonical name, as spelled in the candidate list.
    pub matched: Option<String>,
    pub confidence: Confidence,
    /// Human-readable justification.
    pub reason: String,
    /// Score of the winning rule (0.0 to 1.0).
    pub score: f64,
}

impl MatchOutcome {
    fn none(reason: impl Into<String>, score: f64) -> Self {
        Self {
            matched: None,
            confidence: Confidence::None,
            reason: reason.into(),
            score,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

struct Candidate<'a> {
    index: usize,
    original: &'a str,
    norm: String,
    tokens: Vec<String>,
}

impl Candidate<'_> {
    fn first(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    fn last(&self) -> &str {
        self.tokens.last().map(String::as_str).unwrap_or("")
    }
}

struct Request {
    norm: String,
    compact: String,
    tokens: Vec<String>,
}

/// Stateless matcher; identical input always yields identical output.
#[derive(Debug, Clone, Default)]
pub struct NameMatcher {
    thresholds: MatchThresholds,
}

impl NameMatcher {
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Find the best canonical name for `requested` among `candidates`.
    ///
    /// Callers exclude the requesting player from `candidates`.
    pub fn match_name<S: AsRef<str>>(&self, requested: &str, candidates: &[S]) -> MatchOutcome {
        let norm = normalize_name(requested);
        if norm.is_empty() {
            return MatchOutcome::none("request is empty", 0.0);
        }
        let request = Request {
            compact: compact(&norm),
            tokens: norm.split_whitespace().map(str::to_string).collect(),
            norm,
        };
        let pool: Vec<Candidate<'_>> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let original = name.as_ref();
                let norm = normalize_name(original);
                if norm.is_empty() {
                    return None;
                }
                Some(Candidate {
                    index,
                    original,
                    tokens: norm.split_whitespace().map(str::to_string).collect(),
                    norm,
                })
            })
            .collect();
        if pool.is_empty() {
            return MatchOutcome::none("no candidates to match against", 0.0);
        }

        let outcome = exact_rule(&request, &pool)
            .or_else(|| nickname_rule(&request, &pool))
            .or_else(|| concatenated_rule(&request, &pool))
            .unwrap_or_else(|| self.fuzzy_rules(&request, &pool));
        tracing::trace!(
            requested,
            matched = outcome.matched.as_deref().unwrap_or("-"),
            confidence = %outcome.confidence,
            "name match"
        );
        outcome
    }

    /// Match a request on behalf of `requester`, who is never proposed.
    pub fn match_for(
        &self,
        requester: PlayerId,
        requested: &str,
        players: &[Player],
    ) -> MatchOutcome {
        let candidates: Vec<&str> = players
            .iter()
            .filter(|p| p.id != requester)
            .map(|p| p.name.as_str())
            .collect();
        self.match_name(requested, &candidates)
    }

    /// Rules 4 to 6, which share one similarity pass.
    fn fuzzy_rules(&self, request: &Request, pool: &[Candidate<'_>]) -> MatchOutcome {
        let scored: Vec<(f64, &Candidate<'_>)> = pool
            .iter()
            .map(|candidate| (similarity(&request.norm, &candidate.norm), candidate))
            .collect();
        let best = scored
            .iter()
            .map(|(score, _)| *score)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .unwrap_or(0.0);
        let top: Vec<&Candidate<'_>> = scored
            .iter()
            .filter(|(score, _)| *score == best)
            .map(|(_, candidate)| *candidate)
            .collect();

        match self.thresholds.categorize(best) {
            tier @ (Confidence::High | Confidence::Medium) => {
                let reason = format!("name similarity {:.0}%", best * 100.0);
                return settle(with_reason(top, &reason), tier, best);
            }
            Confidence::Low => {
                let key = phonetic_key(&request.norm);
                let sounds_alike: Vec<&Candidate<'_>> = top
                    .iter()
                    .copied()
                    .filter(|c| phonetic_key(&c.norm) == key)
                    .collect();
                if !sounds_alike.is_empty() {
                    let reason = format!("sounds alike, similarity {:.0}%", best * 100.0);
                    return settle(with_reason(sounds_alike, &reason), Confidence::Medium, best);
                }
            }
            _ => {}
        }

        if let Some(outcome) = partial_rule(request, pool) {
            return outcome;
        }

        if best >= self.thresholds.floor {
            let reason = format!("weak similarity {:.0}%", best * 100.0);
            return settle(with_reason(top, &reason), Confidence::Low, best);
        }
        MatchOutcome::none(
            format!("no candidate above similarity floor (best {:.0}%)", best * 100.0),
            best,
        )
    }
}

/// Best of Jaro-Winkler and normalized Levenshtein similarity.
fn similarity(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler::similarity(a.chars(), b.chars());
    let lev = levenshtein::normalized_similarity(a.chars(), b.chars());
    jw.max(lev)
}

fn with_reason<'c, 'a>(
    hits: Vec<&'c Candidate<'a>>,
    reason: &str,
) -> Vec<(&'c Candidate<'a>, String)> {
    hits.into_iter().map(|c| (c, reason.to_string())).collect()
}

/// Turn the hits of the winning rule into an outcome, downgrading ties.
fn settle(mut hits: Vec<(&Candidate<'_>, String)>, tier: Confidence, score: f64) -> MatchOutcome {
    hits.sort_by(|a, b| a.0.original.cmp(b.0.original).then(a.0.index.cmp(&b.0.index)));
    hits.dedup_by(|a, b| a.0.index == b.0.index);
    let Some((first, reason)) = hits.first() else {
        return MatchOutcome::none("no candidates matched", score);
    };
    if hits.len() == 1 {
        return MatchOutcome {
            matched: Some(first.original.to_string()),
            confidence: tier,
            reason: reason.clone(),
            score,
        };
    }
    let names = hits
        .iter()
        .map(|(c, _)| c.original)
        .collect::<Vec<_>>()
        .join(", ");
    let confidence = tier.downgrade();
    MatchOutcome {
        matched: (confidence != Confidence::None).then(|| first.original.to_string()),
        confidence,
        reason: format!("{reason}; ambiguous between {names}"),
        score,
    }
}

fn exact_rule(request: &Request, pool: &[Candidate<'_>]) -> Option<MatchOutcome> {
    let hits: Vec<_> = pool
        .iter()
        .filter(|c| c.norm == request.norm)
        .map(|c| (c, "exact name match".to_string()))
        .collect();
    (!hits.is_empty()).then(|| settle(hits, Confidence::Exact, 1.0))
}

fn nickname_rule(request: &Request, pool: &[Candidate<'_>]) -> Option<MatchOutcome> {
    let (req_first, req_rest) = request.tokens.split_first()?;
    let hits: Vec<_> = pool
        .iter()
        .filter(|c| is_nickname_of(req_first, c.first()))
        .filter(|c| {
            let cand_rest = &c.tokens[1..];
            match req_rest {
                [] => true,
                [last] if cand_rest.len() > 1 => last == c.last(),
                _ => req_rest == cand_rest,
            }
        })
        .map(|c| (c, format!("nickname {req_first:?} for {:?}", c.first())))
        .collect();
    (!hits.is_empty()).then(|| settle(hits, Confidence::High, NICKNAME_SCORE))
}

fn concatenated_rule(request: &Request, pool: &[Candidate<'_>]) -> Option<MatchOutcome> {
    let hits: Vec<_> = pool
        .iter()
        .filter(|c| c.tokens.len() >= 2)
        .filter_map(|c| {
            let first = c.first();
            let last = c.last();
            let first_initial = first.chars().next()?;
            let last_initial = last.chars().next()?;
            let forms = [
                (compact(&c.norm), "concatenated full name"),
                (format!("{first}{last}"), "concatenated first and last name"),
                (format!("{first}{last_initial}"), "first name and last initial"),
                (format!("{first_initial}{last}"), "first initial and last name"),
            ];
            forms
                .into_iter()
                .find(|(form, _)| *form == request.compact)
                .map(|(_, kind)| (c, kind.to_string()))
        })
        .collect();
    (!hits.is_empty()).then(|| settle(hits, Confidence::High, CONCATENATED_SCORE))
}

fn partial_rule(request: &Request, pool: &[Candidate<'_>]) -> Option<MatchOutcome> {
    let request_initials = request.tokens.len() == 1 && request.compact.len() >= 2;
    let hits: Vec<_> = pool
        .iter()
        .filter_map(|c| {
            if request.tokens.len() < c.tokens.len()
                && request.tokens.iter().all(|t| c.tokens.contains(t))
            {
                return Some((c, "partial name".to_string()));
            }
            if request_initials && c.tokens.len() >= 2 && initials(&c.norm) == request.compact {
                return Some((c, "initials".to_string()));
            }
            if request.compact.len() >= SUBSTRING_MIN_LEN
                && compact(&c.norm).contains(&request.compact)
            {
                return Some((c, "substring of full name".to_string()));
            }
            None
        })
        .collect();
    (!hits.is_empty()).then(|| settle(hits, Confidence::Medium, PARTIAL_SCORE))
}

#[cfg(test)]
mod tests {
    use roster_model::Gender;

    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(requested: &str, candidates: &[&str]) -> MatchOutcome {
        NameMatcher::default().match_name(requested, &names(candidates))
    }

    #[test]
    fn exact_ignores_case_and_spacing() {
        let outcome = run("  chris   SMITH", &["Chris Smith", "Chris Jones"]);
        assert_eq!(outcome.matched.as_deref(), Some("Chris Smith"));
        assert_eq!(outcome.confidence, Confidence::Exact);
    }

    #[test]
    fn duplicate_exact_names_are_downgraded() {
        let outcome = run("Sam Lee", &["Sam Lee", "Sam Lee"]);
        assert_eq!(outcome.confidence, Confidence::High);
        assert!(outcome.reason.contains("ambiguous"));
    }

    #[test]
    fn nickname_with_last_name() {
        let outcome = run("Bob Marsh", &["Robert Marsh", "Robert Jones"]);
        assert_eq!(outcome.matched.as_deref(), Some("Robert Marsh"));
        assert_eq!(outcome.confidence, Confidence::High);
    }

    #[test]
    fn nickname_first_only_tie_goes_to_review() {
        let outcome = run("Bob", &["Robert Marsh", "Robert Jones"]);
        assert_eq!(outcome.matched.as_deref(), Some("Robert Jones"));
        assert_eq!(outcome.confidence, Confidence::Medium);
    }

    #[test]
    fn concatenated_forms() {
        let matcher = NameMatcher::default();
        let roster = names(&["Chris Smith", "Dana Jones"]);
        for request in ["chrissmith", "ChrisS", "csmith"] {
            let outcome = matcher.match_name(request, &roster);
            assert_eq!(outcome.matched.as_deref(), Some("Chris Smith"), "{request}");
            assert_eq!(outcome.confidence, Confidence::High, "{request}");
        }
    }

    #[test]
    fn typo_is_similar() {
        let outcome = run("Jonathon Whitaker", &["Jonathan Whittaker", "Maria Lopez"]);
        assert_eq!(outcome.matched.as_deref(), Some("Jonathan Whittaker"));
        assert!(outcome.confidence >= Confidence::Medium);
    }

    #[test]
    fn first_name_only_is_partial() {
        let outcome = run("Dana", &["Dana Jones", "Chris Smith"]);
        assert_eq!(outcome.matched.as_deref(), Some("Dana Jones"));
        assert_eq!(outcome.confidence, Confidence::Medium);
    }

    #[test]
    fn unrelated_name_is_not_found() {
        let outcome = run("Xavier Quill", &["Dana Jones", "Chris Smith"]);
        assert_eq!(outcome.matched, None);
        assert_eq!(outcome.confidence, Confidence::None);
    }

    #[test]
    fn empty_inputs() {
        let matcher = NameMatcher::default();
        assert_eq!(matcher.match_name("   ", &names(&["Dana Jones"])).confidence, Confidence::None);
        assert_eq!(matcher.match_name("Dana", &Vec::<String>::new()).confidence, Confidence::None);
    }

    #[test]
    fn requester_is_excluded() {
        let players = [
            Player::new(PlayerId::new(0), "Chris Smith", Gender::M, 5.0),
            Player::new(PlayerId::new(1), "Chris Smyth", Gender::M, 5.0),
        ];
        let outcome = NameMatcher::default().match_for(PlayerId::new(0), "Chris Smith", &players);
        assert_eq!(outcome.matched.as_deref(), Some("Chris Smyth"));
        assert!(outcome.confidence < Confidence::Exact);
    }

    #[test]
    fn thresholds_categorize() {
        let t = MatchThresholds::default();
        assert_eq!(t.categorize(0.99), Confidence::High);
        assert_eq!(t.categorize(0.88), Confidence::Medium);
        assert_eq!(t.categorize(0.80), Confidence::Low);
        assert_eq!(t.categorize(0.10), Confidence::None);
    }
}
