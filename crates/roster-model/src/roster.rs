//! The roster arena: players, teams and groups addressed by id.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::LeagueConfig;
use crate::error::{ModelError, Result};
use crate::group::PlayerGroup;
use crate::ids::{GroupId, PlayerId, TeamId};
use crate::player::{Player, name_key};
use crate::team::{Team, TeamStats};

/// Players, teams and groups for one league.
///
/// Players and teams live in arena vectors where an id is its index, so
/// lookups are O(1) and ids stay stable across serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub config: LeagueConfig,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub groups: BTreeMap<GroupId, PlayerGroup>,
    /// Member sets of groups that were explicitly dissolved. The resolver
    /// does not rebuild a cluster with exactly these members.
    #[serde(default)]
    pub dissolved: Vec<BTreeSet<PlayerId>>,
    #[serde(default)]
    next_group_id: u32,
}

impl Roster {
    pub fn new(config: LeagueConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append a player, assigning the next id.
    pub fn push_player(&mut self, mut player: Player) -> PlayerId {
        let id = PlayerId::new(self.players.len() as u32);
        player.id = id;
        self.players.push(player);
        id
    }

    /// Append an empty team, assigning the next id.
    pub fn add_team(&mut self, name: impl Into<String>) -> TeamId {
        let id = TeamId::new(self.teams.len() as u32);
        self.teams.push(Team::new(id, name));
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index()).filter(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index()).filter(|p| p.id == id)
    }

    pub fn require_player(&self, id: PlayerId) -> Result<&Player> {
        self.player(id).ok_or(ModelError::UnknownPlayer(id))
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index()).filter(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.get_mut(id.index()).filter(|t| t.id == id)
    }

    pub fn require_team(&self, id: TeamId) -> Result<&Team> {
        self.team(id).ok_or(ModelError::UnknownTeam(id))
    }

    pub fn group(&self, id: GroupId) -> Option<&PlayerGroup> {
        self.groups.get(&id)
    }

    /// The group a player currently belongs to.
    pub fn group_of(&self, player: PlayerId) -> Option<&PlayerGroup> {
        let id = self.player(player)?.group?;
        self.groups.get(&id).filter(|g| g.contains(player))
    }

    /// Ids of all players whose name matches `name` case-insensitively.
    pub fn players_named(&self, name: &str) -> Vec<PlayerId> {
        let key = name_key(name);
        if key.is_empty() {
            return Vec::new();
        }
        self.players
            .iter()
            .filter(|p| name_key(&p.name) == key)
            .map(|p| p.id)
            .collect()
    }

    /// Members of a team resolved to player records, in roster order of the team.
    pub fn team_members(&self, team: TeamId) -> Vec<&Player> {
        self.team(team)
            .map(|t| t.members.iter().filter_map(|id| self.player(*id)).collect())
            .unwrap_or_default()
    }

    /// Players not on any team.
    pub fn unassigned(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.team.is_none())
            .map(|p| p.id)
            .collect()
    }

    /// Recompute the derived aggregates of one team.
    pub fn refresh_team_stats(&mut self, team: TeamId) {
        let stats = TeamStats::compute(self.team_members(team));
        if let Some(team) = self.team_mut(team) {
            team.stats = stats;
        }
    }

    pub fn refresh_all_stats(&mut self) {
        let ids: Vec<TeamId> = self.teams.iter().map(|t| t.id).collect();
        for id in ids {
            self.refresh_team_stats(id);
        }
    }

    /// Hand out a fresh group id. Ids are never reused.
    pub fn allocate_group_id(&mut self) -> GroupId {
        let id = GroupId::new(self.next_group_id);
        self.next_group_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Gender;

    fn roster() -> Roster {
        let mut roster = Roster::new(LeagueConfig::default());
        roster.push_player(Player::new(PlayerId::new(99), "Ann Lee", Gender::F, 7.0));
        roster.push_player(Player::new(PlayerId::new(99), "Bob Ray", Gender::M, 5.0));
        roster
    }

    #[test]
    fn push_assigns_arena_ids() {
        let roster = roster();
        assert_eq!(roster.players[1].id, PlayerId::new(1));
        assert_eq!(roster.player(PlayerId::new(1)).unwrap().name, "Bob Ray");
        assert!(roster.player(PlayerId::new(5)).is_none());
    }

    #[test]
    fn refresh_stats_reflects_members() {
        let mut roster = roster();
        let team = roster.add_team("Red");
        roster.team_mut(team).unwrap().members = vec![PlayerId::new(0), PlayerId::new(1)];
        roster.refresh_team_stats(team);
        let stats = &roster.team(team).unwrap().stats;
        assert_eq!(stats.size, 2);
        assert_eq!(stats.females, 1);
        assert_eq!(stats.males, 1);
        assert!((stats.average_skill - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn players_named_is_case_insensitive() {
        let roster = roster();
        assert_eq!(roster.players_named("ann  LEE"), vec![PlayerId::new(0)]);
        assert!(roster.players_named("").is_empty());
    }
}
