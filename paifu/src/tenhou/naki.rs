//! Decoding of the call strings found in take and discard columns.
//!
//! The letter marks the call and its position marks the seat the tile came
//! from: at 0 from kamicha, at 2 from toimen, at 4 (6 for daiminkan) from
//! shimocha.

use super::tile::{tile, TSUMOGIRI};
use crate::{Event, Tile};

/// A discard column item. `None` tiles are tsumogiri placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Discard {
    Dahai(Option<Tile>),
    Reach(Option<Tile>),
    Kan(Event),
}

/// Decodes a chi, pon or daiminkan from a take column.
pub(super) fn decode_take(actor: u8, naki: &str) -> Result<Event, String> {
    let bytes = naki.as_bytes();
    let invalid = || format!("invalid call {naki:?}");

    if bytes.first() == Some(&b'c') {
        // e.g. "c275226" => chi 7p with 06p from kamicha
        if naki.len() != 7 {
            return Err(invalid());
        }
        Ok(Event::Chi {
            actor,
            target: (actor + 3) % 4,
            pai: pair(naki, 1)?,
            consumed: [pair(naki, 3)?, pair(naki, 5)?],
        })
    } else if let Some(idx) = naki.find('p') {
        if naki.len() != 7 {
            return Err(invalid());
        }
        let (offset, pai, consumed) = match idx {
            // e.g. "p252525" => pon 5p from kamicha
            0 => (3, 1, [3, 5]),
            // e.g. "12p1212" => pon 2m from toimen
            2 => (2, 3, [0, 5]),
            // e.g. "3737p37" => pon 7s from shimocha
            4 => (1, 5, [0, 2]),
            _ => return Err(invalid()),
        };
        Ok(Event::Pon {
            actor,
            target: (actor + offset) % 4,
            pai: pair(naki, pai)?,
            consumed: [pair(naki, consumed[0])?, pair(naki, consumed[1])?],
        })
    } else if let Some(idx) = naki.find('m') {
        if naki.len() != 9 {
            return Err(invalid());
        }
        let (offset, pai, consumed) = match idx {
            // e.g. "m39393939" => kan 9s from kamicha
            0 => (3, 1, [3, 5, 7]),
            // e.g. "26m262626" => kan 6p from toimen
            2 => (2, 3, [0, 5, 7]),
            // e.g. "131313m13" => kan 3m from shimocha
            6 => (1, 7, [0, 2, 4]),
            _ => return Err(invalid()),
        };
        Ok(Event::Daiminkan {
            actor,
            target: (actor + offset) % 4,
            pai: pair(naki, pai)?,
            consumed: [
                pair(naki, consumed[0])?,
                pair(naki, consumed[1])?,
                pair(naki, consumed[2])?,
            ],
        })
    } else {
        Err(invalid())
    }
}

/// Decodes a kakan, ankan or riichi declaration from a discard column.
pub(super) fn decode_discard(actor: u8, naki: &str) -> Result<Discard, String> {
    let invalid = || format!("invalid call {naki:?}");

    if let Some(idx) = naki.find('k') {
        if naki.len() != 9 {
            return Err(invalid());
        }
        let (pai, consumed) = match idx {
            // e.g. "k16161616" => pon 6m from kamicha then kan
            0 => (1, [3, 5, 7]),
            // e.g. "41k414141" => pon E from toimen then kan
            2 => (3, [0, 5, 7]),
            // e.g. "4646k4646" => pon F from shimocha then kan
            4 => (5, [0, 2, 7]),
            _ => return Err(invalid()),
        };
        Ok(Discard::Kan(Event::Kakan {
            actor,
            pai: pair(naki, pai)?,
            consumed: [
                pair(naki, consumed[0])?,
                pair(naki, consumed[1])?,
                pair(naki, consumed[2])?,
            ],
        }))
    } else if naki.find('a') == Some(6) {
        // e.g. "424242a42" => ankan S
        if naki.len() != 9 {
            return Err(invalid());
        }
        Ok(Discard::Kan(Event::Ankan {
            actor,
            consumed: [pair(naki, 0)?, pair(naki, 2)?, pair(naki, 4)?, pair(naki, 7)?],
        }))
    } else if naki.starts_with('r') {
        // e.g. "r35" => discard 5s to declare riichi, "r60" with the drawn tile
        if naki.len() != 3 {
            return Err(invalid());
        }
        let code = code(naki, 1)?;
        if code == TSUMOGIRI {
            Ok(Discard::Reach(None))
        } else {
            Ok(Discard::Reach(Some(tile_of(code)?)))
        }
    } else {
        Err(invalid())
    }
}

fn code(naki: &str, at: usize) -> Result<u32, String> {
    naki.get(at..at + 2)
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("invalid tile at {at} in call {naki:?}"))
}

fn tile_of(code: u32) -> Result<Tile, String> {
    tile(code).ok_or_else(|| format!("tile code {code} out of range"))
}

fn pair(naki: &str, at: usize) -> Result<Tile, String> {
    tile_of(code(naki, at)?)
}
