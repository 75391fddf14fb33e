//! Arena identifiers.
//!
//! Every entity is addressed by a small integer handed out when it is
//! created. Players and teams use their id as the index into the roster's
//! arena vectors, so ids are never reused.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }

            /// Position of this id in its arena.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        /// Accepts both the bare number (`3`) and the display form (`P3`).
        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix($prefix)
                    .or_else(|| trimmed.strip_prefix(&$prefix.to_lowercase()))
                    .unwrap_or(trimmed);
                digits
                    .parse::<u32>()
                    .map(Self)
                    .map_err(|_| ModelError::InvalidId(s.to_string()))
            }
        }
    };
}

arena_id!(
    /// Identifier of a rostered player.
    PlayerId,
    "P"
);
arena_id!(
    /// Identifier of a team.
    TeamId,
    "T"
);
arena_id!(
    /// Identifier of a player group.
    GroupId,
    "G"
);
arena_id!(
    /// Identifier of a warning ledger entry.
    WarningId,
    "W"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_prefixed_forms() {
        assert_eq!("3".parse::<PlayerId>().unwrap(), PlayerId::new(3));
        assert_eq!("P3".parse::<PlayerId>().unwrap(), PlayerId::new(3));
        assert_eq!("t12".parse::<TeamId>().unwrap(), TeamId::new(12));
        assert!("X1".parse::<GroupId>().is_err());
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&WarningId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
