//! Groups of players that must be placed together.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, PlayerId};

/// Smallest allowed group.
pub const MIN_GROUP_SIZE: usize = 2;
/// Largest allowed group.
pub const MAX_GROUP_SIZE: usize = 4;

/// Colors handed out to groups, indexed by label slot.
pub const GROUP_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#9a6324",
];

/// Label for a slot: `A`..`Z`, then `AA`, `AB`, ...
pub fn slot_label(slot: u32) -> String {
    let mut n = slot as u64 + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

pub fn slot_color(slot: u32) -> &'static str {
    GROUP_PALETTE[slot as usize % GROUP_PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGroup {
    pub id: GroupId,
    /// Label slot; the label and color are derived from it once at creation.
    pub slot: u32,
    pub label: String,
    pub color: String,
    pub members: BTreeSet<PlayerId>,
}

impl PlayerGroup {
    pub fn new(id: GroupId, slot: u32, members: BTreeSet<PlayerId>) -> Self {
        Self {
            id,
            slot,
            label: slot_label(slot),
            color: slot_color(slot).to_string(),
            members,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }

    /// True when the size is within `MIN_GROUP_SIZE..=MAX_GROUP_SIZE`.
    pub fn is_valid_size(&self) -> bool {
        (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&self.members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_spreadsheet_columns() {
        assert_eq!(slot_label(0), "A");
        assert_eq!(slot_label(25), "Z");
        assert_eq!(slot_label(26), "AA");
        assert_eq!(slot_label(27), "AB");
        assert_eq!(slot_label(701), "ZZ");
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(slot_color(0), slot_color(GROUP_PALETTE.len() as u32));
    }
}
