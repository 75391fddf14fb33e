//! Data model for roster reconciliation and team assignment.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod group;
pub mod ids;
pub mod player;
pub mod roster;
pub mod team;
pub mod warning;

pub use config::LeagueConfig;
pub use error::{ModelError, Result};
pub use group::{MAX_GROUP_SIZE, MIN_GROUP_SIZE, PlayerGroup, slot_color, slot_label};
pub use ids::{GroupId, PlayerId, TeamId, WarningId};
pub use player::{
    DEFAULT_SKILL, Gender, MAX_SKILL, MIN_SKILL, Player, name_key, names_equal, parse_skill,
};
pub use roster::Roster;
pub use team::{Team, TeamStats};
pub use warning::{
    Confidence, NewWarning, StructuredWarning, WarningCategory, WarningStatus,
};
