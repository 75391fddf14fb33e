//! The state file a command works on, plus lookups by user-typed reference.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use roster_core::{EngineOptions, MoveProposal, RosterEngine};
use roster_model::{GroupId, LeagueConfig, PlayerId, TeamId, WarningId, names_equal};
use roster_persistence::{JsonFileStore, PersistenceError, StateStore};

/// Engine plus the file it was loaded from.
pub struct Workspace {
    store: JsonFileStore,
    pub engine: RosterEngine,
}

impl Workspace {
    /// Load the state at `path`, or start empty when the file does not exist.
    ///
    /// A `config` replaces the league configuration stored in the file.
    pub fn open(path: &Path, options: EngineOptions, config: Option<LeagueConfig>) -> Result<Self> {
        let store = JsonFileStore::new(path);
        let loaded = store.load().map_err(persistence_error)?;
        let engine = match loaded {
            Some(mut state) => {
                if let Some(config) = config {
                    state.roster.config = config;
                }
                RosterEngine::from_state(state, options)
            }
            None => RosterEngine::new(config.unwrap_or_default(), options),
        };
        Ok(Self { store, engine })
    }

    /// An empty workspace that will overwrite `path` on save.
    pub fn fresh(path: &Path, options: EngineOptions, config: Option<LeagueConfig>) -> Self {
        Self {
            store: JsonFileStore::new(path),
            engine: RosterEngine::new(config.unwrap_or_default(), options),
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn save(&mut self) -> Result<()> {
        self.store
            .save(self.engine.state())
            .map_err(persistence_error)
    }
}

/// Fold the user-facing message and suggestion into one error.
pub fn persistence_error(err: PersistenceError) -> anyhow::Error {
    let mut message = err.user_message();
    if let Some(hint) = err.suggestion() {
        message.push_str("\nhint: ");
        message.push_str(&hint);
    }
    anyhow!(message).context(err.to_string())
}

/// Read a league configuration JSON file. Missing fields take defaults.
pub fn load_league_config(path: &Path) -> Result<LeagueConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read league config: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse league config: {}", path.display()))
}

/// Read a JSON array of move proposals.
pub fn read_proposals(path: &Path) -> Result<Vec<MoveProposal>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read proposals: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse proposals: {}", path.display()))
}

/// A player by id (`P3`, `3`) or by exact name.
pub fn find_player(engine: &RosterEngine, reference: &str) -> Result<PlayerId> {
    let roster = &engine.state().roster;
    if let Ok(id) = reference.parse::<PlayerId>()
        && roster.player(id).is_some()
    {
        return Ok(id);
    }
    match roster.players_named(reference).as_slice() {
        [id] => Ok(*id),
        [] => bail!("no player named {reference:?}"),
        ids => bail!(
            "{reference:?} names several players ({}); use an id",
            join_ids(ids)
        ),
    }
}

/// A team by id (`T1`, `1`) or by name; `none` and `unassigned` mean the pool.
pub fn find_team(engine: &RosterEngine, reference: &str) -> Result<Option<TeamId>> {
    let trimmed = reference.trim();
    if ["none", "unassigned", "-"]
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        return Ok(None);
    }
    let roster = &engine.state().roster;
    if let Ok(id) = trimmed.parse::<TeamId>()
        && roster.team(id).is_some()
    {
        return Ok(Some(id));
    }
    let hits: Vec<TeamId> = roster
        .teams
        .iter()
        .filter(|team| names_equal(&team.name, trimmed))
        .map(|team| team.id)
        .collect();
    match hits.as_slice() {
        [id] => Ok(Some(*id)),
        [] => bail!("no team named {trimmed:?}"),
        ids => bail!("{trimmed:?} names several teams ({}); use an id", join_ids(ids)),
    }
}

/// A group by id (`G2`) or by label (`B`).
pub fn find_group(engine: &RosterEngine, reference: &str) -> Result<GroupId> {
    let trimmed = reference.trim();
    if let Ok(id) = trimmed.parse::<GroupId>()
        && engine.state().roster.group(id).is_some()
    {
        return Ok(id);
    }
    engine
        .groups()
        .find(|group| group.label.eq_ignore_ascii_case(trimmed))
        .map(|group| group.id)
        .ok_or_else(|| anyhow!("no group {trimmed:?}"))
}

pub fn parse_warning_id(reference: &str) -> Result<WarningId> {
    reference
        .parse::<WarningId>()
        .with_context(|| format!("invalid warning id {reference:?}"))
}

fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter().map(T::to_string).collect::<Vec<_>>().join(", ")
}
