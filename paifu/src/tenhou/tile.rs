use crate::Tile;

use num_enum::TryFromPrimitive;

/// Placeholder in a discard column for "discarded the tile just drawn".
pub(crate) const TSUMOGIRI: u32 = 60;

/// Tile codes of tenhou.net/6: suit digit then number, `5x` for red fives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub(crate) enum TenhouTile {
    Unknown = 0,

    Man1 = 11,
    Man2 = 12,
    Man3 = 13,
    Man4 = 14,
    Man5 = 15,
    Man6 = 16,
    Man7 = 17,
    Man8 = 18,
    Man9 = 19,

    Pin1 = 21,
    Pin2 = 22,
    Pin3 = 23,
    Pin4 = 24,
    Pin5 = 25,
    Pin6 = 26,
    Pin7 = 27,
    Pin8 = 28,
    Pin9 = 29,

    Sou1 = 31,
    Sou2 = 32,
    Sou3 = 33,
    Sou4 = 34,
    Sou5 = 35,
    Sou6 = 36,
    Sou7 = 37,
    Sou8 = 38,
    Sou9 = 39,

    East = 41,
    South = 42,
    West = 43,
    North = 44,
    Haku = 45,
    Hatsu = 46,
    Chun = 47,

    AkaMan5 = 51,
    AkaPin5 = 52,
    AkaSou5 = 53,
}

impl TenhouTile {
    #[must_use]
    pub(crate) fn from_code(code: u32) -> Option<Self> {
        let code = u8::try_from(code).ok()?;
        Self::try_from(code).ok()
    }

    #[must_use]
    pub(crate) fn to_tile(self) -> Option<Tile> {
        let code = self as u8;
        match self {
            Self::Unknown => Some(Tile::UNKNOWN),
            Self::AkaMan5 | Self::AkaPin5 | Self::AkaSou5 => {
                Tile::from_kind((code - 51) * 9 + 4).map(Tile::akaize)
            }
            _ => Tile::from_kind((code / 10 - 1) * 9 + code % 10 - 1),
        }
    }
}

/// Maps a numeric tile code onto a tile. `None` for codes outside the table,
/// including the tsumogiri placeholder.
#[must_use]
pub(crate) fn tile(code: u32) -> Option<Tile> {
    TenhouTile::from_code(code)?.to_tile()
}
