//! Import of raw roster rows.
//!
//! Rows arrive as untyped strings. Malformed gender and skill values are
//! defaulted and noted as `info` warnings; nothing in a row is fatal except a
//! missing name, which skips the row. Every teammate request is matched
//! against the full roster and leaves exactly one reviewable warning.

use std::collections::BTreeMap;

use roster_match::NameMatcher;
use roster_model::{
    DEFAULT_SKILL, Gender, NewWarning, Player, PlayerId, name_key, parse_skill,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::state::RosterState;

/// One roster row exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPlayer {
    pub name: String,
    pub gender: String,
    pub skill: String,
    pub skill_override: String,
    /// Teammate request cell; several names may share one cell.
    pub teammate_requests: String,
    pub avoid_requests: String,
    pub handler: String,
}

impl RawPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = skill.into();
        self
    }

    #[must_use]
    pub fn with_teammates(mut self, cell: impl Into<String>) -> Self {
        self.teammate_requests = cell.into();
        self
    }

    #[must_use]
    pub fn with_avoids(mut self, cell: impl Into<String>) -> Self {
        self.avoid_requests = cell.into();
        self
    }
}

/// Counts from one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Ids of the players added, in row order.
    pub players: Vec<PlayerId>,
    /// Warnings recorded, informational ones included.
    pub warnings_created: usize,
    /// Gender and skill values replaced by defaults.
    pub defaults_applied: usize,
    /// Rows dropped because the name was blank.
    pub skipped_rows: usize,
    /// Players whose name duplicates an earlier roster entry.
    pub duplicates: usize,
}

/// Split a request cell on `,` `;` `/` `&` and the word "and".
///
/// Whitespace inside each name is collapsed; blank entries are dropped.
pub fn split_requests(cell: &str) -> Vec<String> {
    let mut requests = Vec::new();
    for piece in cell.split([',', ';', '/', '&']) {
        let mut current: Vec<&str> = Vec::new();
        for word in piece.split_whitespace() {
            if word.eq_ignore_ascii_case("and") {
                if !current.is_empty() {
                    requests.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(word);
            }
        }
        if !current.is_empty() {
            requests.push(current.join(" "));
        }
    }
    requests
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "y" | "yes" | "true" | "1" | "x" | "handler"
    )
}

/// Append `rows` to the roster and record a warning for every request.
pub fn import(
    state: &mut RosterState,
    rows: Vec<RawPlayer>,
    matcher: &NameMatcher,
) -> ImportReport {
    let mut report = ImportReport::default();
    let warnings_before = state.ledger.len();

    for (row, raw) in rows.into_iter().enumerate() {
        let name = raw.name.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            warn!(row = row + 1, "roster row has no name; skipped");
            state.ledger.record(NewWarning::info(
                "",
                None,
                format!("row {} skipped: missing name", row + 1),
            ));
            report.skipped_rows += 1;
            continue;
        }
        let (player, notes) = build_player(&name, &raw);
        let id = state.roster.push_player(player);
        report.defaults_applied += notes.len();
        for note in notes {
            state.ledger.record(NewWarning::info(&name, Some(id), note));
        }
        report.players.push(id);
    }

    report.duplicates = note_duplicates(state, &report.players);

    for id in &report.players {
        let Some(player) = state.roster.player(*id) else {
            continue;
        };
        let requester = player.name.clone();
        let requests = player.teammate_requests.clone();
        for requested in requests {
            let outcome = matcher.match_for(*id, &requested, &state.roster.players);
            debug!(
                requester = %requester,
                requested = %requested,
                confidence = %outcome.confidence,
                "matched teammate request"
            );
            state.ledger.record_match(&requester, *id, &requested, &outcome);
        }
    }

    report.warnings_created = state.ledger.len() - warnings_before;
    info!(
        players = report.players.len(),
        warnings = report.warnings_created,
        defaults = report.defaults_applied,
        skipped = report.skipped_rows,
        "roster import complete"
    );
    report
}

/// Build a player from a row, returning notes for every defaulted field.
///
/// Blank gender and skill cells take the defaults silently; only values that
/// were typed but cannot be read produce a note.
fn build_player(name: &str, raw: &RawPlayer) -> (Player, Vec<String>) {
    let mut notes = Vec::new();

    let gender = if raw.gender.trim().is_empty() {
        Gender::Other
    } else if let Some(gender) = Gender::parse(&raw.gender) {
        gender
    } else {
        warn!(player = name, value = %raw.gender, "unrecognized gender; defaulted to Other");
        notes.push(format!(
            "gender {:?} not recognized; defaulted to Other",
            raw.gender
        ));
        Gender::Other
    };

    let skill = if raw.skill.trim().is_empty() {
        DEFAULT_SKILL
    } else {
        parse_skill(&raw.skill).unwrap_or_else(|_| {
            warn!(player = name, value = %raw.skill, "unreadable skill; defaulted");
            notes.push(format!(
                "skill {:?} not readable; defaulted to {DEFAULT_SKILL}",
                raw.skill
            ));
            DEFAULT_SKILL
        })
    };

    let skill_override = if raw.skill_override.trim().is_empty() {
        None
    } else {
        match parse_skill(&raw.skill_override) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    player = name,
                    value = %raw.skill_override,
                    "unreadable skill override; ignored"
                );
                notes.push(format!(
                    "skill override {:?} not readable; ignored",
                    raw.skill_override
                ));
                None
            }
        }
    };

    let player = Player::new(PlayerId::new(0), name, gender, skill)
        .with_skill_override(skill_override)
        .with_teammate_requests(split_requests(&raw.teammate_requests))
        .with_avoid_requests(split_requests(&raw.avoid_requests))
        .with_handler(parse_flag(&raw.handler));
    (player, notes)
}

/// Record an info warning for each new player sharing a name with an
/// earlier roster entry. Returns how many were found.
fn note_duplicates(state: &mut RosterState, added: &[PlayerId]) -> usize {
    let mut first_seen: BTreeMap<String, PlayerId> = BTreeMap::new();
    let mut duplicates = Vec::new();
    for player in &state.roster.players {
        let key = name_key(&player.name);
        match first_seen.get(&key) {
            Some(first) if added.contains(&player.id) => {
                duplicates.push((player.id, player.name.clone(), *first));
            }
            Some(_) => {}
            None => {
                first_seen.insert(key, player.id);
            }
        }
    }
    for (id, name, first) in &duplicates {
        warn!(player = %name, first = %first, "duplicate player name");
        state.ledger.record(NewWarning::info(
            name,
            Some(*id),
            format!("name also used by {first}; requests naming it need review"),
        ));
    }
    duplicates.len()
}

#[cfg(test)]
mod tests {
    use roster_model::{Confidence, WarningCategory};

    use super::*;

    #[test]
    fn request_cells_split_on_separators_and_and() {
        assert_eq!(
            split_requests(" Ann Lee, Bob;Cal / Dee & Eve and  Fay  Ray "),
            vec!["Ann Lee", "Bob", "Cal", "Dee", "Eve", "Fay Ray"]
        );
        assert_eq!(split_requests("Sandy Anderson"), vec!["Sandy Anderson"]);
        assert!(split_requests(" , ; and ").is_empty());
    }

    #[test]
    fn malformed_fields_are_defaulted() {
        let mut state = RosterState::default();
        let rows = vec![RawPlayer::new("Ann").with_gender("??").with_skill("great")];
        let report = import(&mut state, rows, &NameMatcher::default());

        assert_eq!(report.defaults_applied, 2);
        let ann = &state.roster.players[0];
        assert_eq!(ann.gender, Gender::Other);
        assert_eq!(ann.skill, DEFAULT_SKILL);
        assert!(state.ledger.queue().is_empty());
        assert_eq!(state.ledger.len(), 2);
    }

    #[test]
    fn every_request_leaves_one_warning() {
        let mut state = RosterState::default();
        let rows = vec![
            RawPlayer::new("Ann Lee").with_skill("7").with_teammates("Bea Ray, Zed"),
            RawPlayer::new("Bea Ray").with_skill("6").with_teammates("ann lee"),
        ];
        let report = import(&mut state, rows, &NameMatcher::default());

        assert_eq!(report.warnings_created, 3);
        let categories: Vec<WarningCategory> =
            state.ledger.entries().iter().map(|w| w.category).collect();
        assert_eq!(
            categories,
            vec![
                WarningCategory::MatchExact,
                WarningCategory::NotFound,
                WarningCategory::MatchExact
            ]
        );
        assert_eq!(state.ledger.entries()[2].confidence, Confidence::Exact);
    }

    #[test]
    fn blank_names_are_skipped_and_duplicates_noted() {
        let mut state = RosterState::default();
        let rows = vec![
            RawPlayer::new("Sam Lee").with_gender("m").with_skill("5"),
            RawPlayer::new("   ").with_gender("f"),
            RawPlayer::new("sam  lee").with_gender("m").with_skill("5"),
        ];
        let report = import(&mut state, rows, &NameMatcher::default());

        assert_eq!(report.skipped_rows, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(state.roster.players.len(), 2);
        assert_eq!(state.roster.players[1].name, "sam lee");
    }
}
