use std::fmt;
use std::str::FromStr;

use boomphf::hashmap::BoomHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const TILE_COUNT: usize = 3 * 9 + 7 + 3 + 1;
const TILE_NAMES: [&str; TILE_COUNT] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", // m
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", // p
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", // s
    "E", "S", "W", "N", "P", "F", "C", // z
    "5mr", "5pr", "5sr", // red fives
    "?",   // hidden
];

static TILE_NAMES_MAP: Lazy<BoomHashMap<&'static str, Tile>> = Lazy::new(|| {
    let tiles = (0..TILE_COUNT as u8).map(Tile).collect();
    BoomHashMap::new(TILE_NAMES.to_vec(), tiles)
});

/// A tile in mjai notation.
///
/// Kinds `0..34` are the 34 regular tiles in `1m..9m, 1p..9p, 1s..9s,
/// E S W N P F C` order, `34..37` are the red fives and `37` is a tile whose
/// face is not recorded.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(u8);

#[derive(Debug, Error)]
#[error("not a valid tile: {0:?}")]
pub struct InvalidTile(String);

impl Tile {
    pub const UNKNOWN: Self = Self(37);
    pub const EAST: Self = Self(27);
    const RED_FIVES: [Self; 3] = [Self(34), Self(35), Self(36)];

    /// Builds a regular tile from its kind index in `0..34`.
    #[inline]
    #[must_use]
    pub const fn from_kind(kind: u8) -> Option<Self> {
        if kind < 34 {
            Some(Self(kind))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn akaize(self) -> Self {
        match self.0 {
            4 => Self::RED_FIVES[0],
            13 => Self::RED_FIVES[1],
            22 => Self::RED_FIVES[2],
            _ => self,
        }
    }

    /// Returns the wind tile for a prevalent wind index (0 = East).
    #[inline]
    #[must_use]
    pub const fn wind(index: u8) -> Self {
        Self(Self::EAST.0 + index % 4)
    }
}

impl FromStr for Tile {
    type Err = InvalidTile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TILE_NAMES_MAP
            .get(s)
            .copied()
            .ok_or_else(|| InvalidTile(s.to_owned()))
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TILE_NAMES[self.as_usize()])
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_round_trip() {
        for (id, name) in TILE_NAMES.iter().enumerate() {
            let tile: Tile = name.parse().unwrap();
            assert_eq!(tile.as_usize(), id);
            assert_eq!(tile.to_string(), *name);
        }
        assert!("0m".parse::<Tile>().is_err());
        assert_eq!(
            "5z".parse::<Tile>().unwrap_err().to_string(),
            r#"not a valid tile: "5z""#
        );
    }

    #[test]
    fn aka() {
        let five: Tile = "5p".parse().unwrap();
        let red = five.akaize();
        assert_eq!(red.to_string(), "5pr");
        assert_eq!(red.akaize(), red);
        assert_eq!("E".parse::<Tile>().unwrap().akaize().to_string(), "E");
    }

    #[test]
    fn winds() {
        assert_eq!(Tile::wind(0).to_string(), "E");
        assert_eq!(Tile::wind(1).to_string(), "S");
        assert_eq!(Tile::wind(3).to_string(), "N");
        assert_eq!(Tile::wind(2).to_string(), "W");
        assert_eq!(Tile::from_kind(33).map(|t| t.to_string()).as_deref(), Some("C"));
        assert!(Tile::from_kind(34).is_none());
    }
}
