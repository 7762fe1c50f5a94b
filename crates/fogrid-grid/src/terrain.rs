//! Terrain type tags.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// A node's terrain class, wrapping the integer tag used by the input
/// formats.
///
/// Tag `0` ([`Terrain::OPEN`]) is always passable and tag `1`
/// ([`Terrain::WALL`]) is permanently impassable. Every other value is a
/// conditionally-passable obstacle class: it blocks movement once revealed,
/// unless it is the currently unlocked help type or has been permanently
/// reclassified to `OPEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Terrain(pub i32);

impl Terrain {
    /// Default-passable terrain (tag "0").
    pub const OPEN: Self = Self(0);
    /// Permanently impassable terrain (tag "1").
    pub const WALL: Self = Self(1);

    /// Create a terrain tag with the given value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the underlying tag value.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Whether this is the default-passable terrain.
    pub const fn is_open(self) -> bool {
        self.0 == Self::OPEN.0
    }

    /// Whether this is permanently impassable terrain.
    pub const fn is_wall(self) -> bool {
        self.0 == Self::WALL.0
    }
}

impl From<i32> for Terrain {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

impl FromStr for Terrain {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>().map(Terrain)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn terrain_round_trip() {
        let t = Terrain(5);
        let json = serde_json::to_string(&t).unwrap();
        let back: Terrain = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
