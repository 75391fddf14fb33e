use thiserror::Error;

use crate::ids::{GroupId, PlayerId, TeamId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unrecognized gender value: {0:?}")]
    InvalidGender(String),
    #[error("invalid skill rating: {0:?}")]
    InvalidSkill(String),
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("unknown team {0}")]
    UnknownTeam(TeamId),
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),
}

pub type Result<T> = std::result::Result<T, ModelError>;
