//! Animation index table: which frames make up each animation, per body part
//! and facing direction.
//!
//! The table is plain data (see `table.yaml`) so it can be inspected and
//! swapped without touching code.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

const BUILTIN_TABLE: &str = include_str!("table.yaml");

/// Animation name used for head frames, which only vary by direction.
pub const HEAD_FACING: &str = "facing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Down,
    RightDown,
    Right,
    RightUp,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 5] =
        [Direction::Down, Direction::RightDown, Direction::Right, Direction::RightUp, Direction::Up];

    pub fn name(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::RightDown => "rightDown",
            Direction::Right => "right",
            Direction::RightUp => "rightUp",
            Direction::Up => "up",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Body-part category a frame sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    Legs,
    Head,
    Unarmed,
    Pistol,
    Smg,
    Rifle,
    Shotgun,
}

type Animations = BTreeMap<String, BTreeMap<Direction, Vec<u32>>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexTable {
    parts: BTreeMap<Part, Animations>,
}

impl IndexTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self, serde_yaml::Error> { Self::from_yaml_str(BUILTIN_TABLE) }

    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> { serde_yaml::from_str(s) }

    /// Frame indexes for the combination, or an empty slice when the table
    /// has no entry for it.
    pub fn lookup(&self, part: Part, animation: &str, direction: Direction) -> &[u32] {
        self.parts
            .get(&part)
            .and_then(|animations| animations.get(animation))
            .and_then(|directions| directions.get(&direction))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn head_index(&self, direction: Direction) -> Option<u32> {
        self.lookup(Part::Head, HEAD_FACING, direction).first().copied()
    }

    pub fn animations(&self, part: Part) -> impl Iterator<Item = &str> {
        self.parts.get(&part).into_iter().flat_map(|a| a.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> IndexTable { IndexTable::builtin().unwrap() }

    #[test]
    fn builtin_lookups() {
        let t = table();
        assert_eq!(t.lookup(Part::Legs, "walk", Direction::Right), &[13, 14, 15, 16]);
        assert_eq!(t.lookup(Part::Unarmed, "handsUp", Direction::Up), &[87]);
        assert_eq!(t.lookup(Part::Pistol, "rack", Direction::Down), &[21, 22, 23, 22]);
        assert_eq!(t.head_index(Direction::RightUp), Some(3));
    }

    #[test]
    fn unknown_combinations_are_empty() {
        let t = table();
        assert!(t.lookup(Part::Legs, "moonwalk", Direction::Down).is_empty());
        assert!(t.lookup(Part::Legs, "use", Direction::Down).is_empty());
        // leg idle has no rightUp frame
        assert!(t.lookup(Part::Legs, "idle", Direction::RightUp).is_empty());
        assert!(IndexTable::default().lookup(Part::Head, HEAD_FACING, Direction::Up).is_empty());
    }

    #[test]
    fn crouch_splits_by_facing() {
        let t = table();
        for d in [Direction::Down, Direction::RightDown, Direction::Right] {
            assert_eq!(t.lookup(Part::Legs, "crouch", d), &[67]);
        }
        for d in [Direction::RightUp, Direction::Up] {
            assert_eq!(t.lookup(Part::Legs, "crouch", d), &[68]);
        }
    }

    #[test]
    fn direction_independent_animations() {
        let t = table();
        for d in Direction::ALL {
            assert_eq!(t.lookup(Part::Legs, "climb", d), &[69, 70, 71, 72]);
            assert_eq!(t.lookup(Part::Unarmed, "keelOver", d), &[93]);
        }
    }

    #[test]
    fn long_guns_share_the_smg_run_cycle() {
        let t = table();
        for d in Direction::ALL {
            let smg = t.lookup(Part::Smg, "run", d);
            assert_eq!(smg.len(), 4);
            assert_eq!(t.lookup(Part::Shotgun, "run", d), smg);
            assert_eq!(t.lookup(Part::Rifle, "run", d), smg);
        }
    }

    #[test]
    fn every_builtin_entry_is_non_empty() {
        let t = table();
        for (part, animations) in &t.parts {
            for (name, directions) in animations {
                for (direction, frames) in directions {
                    assert!(!frames.is_empty(), "{:?}/{}/{} is empty", part, name, direction);
                }
            }
        }
        assert!(t.animations(Part::Rifle).any(|a| a == "reload"));
    }

    #[test]
    fn custom_tables_load_from_yaml() {
        let t = IndexTable::from_yaml_str("legs:\n  idle:\n    down: [4]\n").unwrap();
        assert_eq!(t.lookup(Part::Legs, "idle", Direction::Down), &[4]);
        assert!(IndexTable::from_yaml_str("legs:\n  idle:\n    sideways: [1]\n").is_err());
    }
}
