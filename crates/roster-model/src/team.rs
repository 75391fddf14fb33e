//! Teams and their derived statistics.

use serde::{Deserialize, Serialize};

use crate::ids::{PlayerId, TeamId};
use crate::player::{Gender, Player};

/// Aggregates derived from a team's members.
///
/// Never edited by hand; [`crate::Roster::refresh_team_stats`] recomputes
/// them after every committed mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub size: usize,
    pub average_skill: f32,
    pub females: usize,
    pub males: usize,
    pub others: usize,
    pub handlers: usize,
}

impl TeamStats {
    pub fn compute<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let mut stats = Self::default();
        let mut skill_total = 0.0f32;
        for player in members {
            stats.size += 1;
            skill_total += player.effective_skill();
            match player.gender {
                Gender::F => stats.females += 1,
                Gender::M => stats.males += 1,
                Gender::Other => stats.others += 1,
            }
            if player.handler {
                stats.handlers += 1;
            }
        }
        if stats.size > 0 {
            stats.average_skill = skill_total / stats.size as f32;
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Members in insertion order.
    pub members: Vec<PlayerId>,
    #[serde(default)]
    pub stats: TeamStats,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
            stats: TeamStats::default(),
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
