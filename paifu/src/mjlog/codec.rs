//! Tenhou's compact codes: 136-tile ids and the packed `m` attribute of
//! `<N>`.

use crate::Tile;

pub(crate) const TILE_ID_COUNT: u16 = 136;
/// Some logs record a tile whose face was never shown with this id.
const HIDDEN_TILE_ID: u16 = TILE_ID_COUNT;

/// Maps a 136-tile id onto a tile. Copy 0 of each five is the red one when
/// `aka` is set.
#[must_use]
pub(crate) fn tile(id: u16, aka: bool) -> Option<Tile> {
    if id == HIDDEN_TILE_ID {
        return Some(Tile::UNKNOWN);
    }
    if id > HIDDEN_TILE_ID {
        return None;
    }
    let kind = (id / 4) as u8;
    let tile = Tile::from_kind(kind)?;
    if aka && id % 4 == 0 && matches!(kind, 4 | 13 | 22) {
        Some(tile.akaize())
    } else {
        Some(tile)
    }
}

/// A decoded call, as 136-tile ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Meld {
    Chi { pai: u16, consumed: [u16; 2] },
    Pon { pai: u16, consumed: [u16; 2] },
    Daiminkan { pai: u16, consumed: [u16; 3] },
    /// `pai` is the tile added to the earlier pon.
    Kakan { pai: u16, consumed: [u16; 3] },
    Ankan { consumed: [u16; 4] },
}

/// Decodes `m` into the call and the seat offset of the player called from
/// (1 = shimocha, 2 = toimen, 3 = kamicha, 0 = self).
pub(crate) fn decode_meld(m: u16) -> Result<(Meld, u8), String> {
    let from = (m & 0x3) as u8;

    let meld = if m & 0x4 != 0 {
        decode_chi(m)?
    } else if m & 0x8 != 0 {
        let (kind, called, unused) = pon_parts(m)?;
        let tiles = pon_tiles(kind, unused);
        let (pai, consumed) = split_called(tiles, called);
        Meld::Pon { pai, consumed }
    } else if m & 0x10 != 0 {
        let (kind, _, added) = pon_parts(m)?;
        Meld::Kakan {
            pai: kind * 4 + added,
            consumed: pon_tiles(kind, added),
        }
    } else if m & 0x20 != 0 {
        return Err(format!("nukidora call {m} in a four-player game"));
    } else {
        let id = m >> 8;
        if id >= TILE_ID_COUNT {
            return Err(format!("kan tile id {id} out of range in call {m}"));
        }
        let base = id / 4 * 4;
        let all = [base, base + 1, base + 2, base + 3];
        if from == 0 {
            Meld::Ankan { consumed: all }
        } else {
            let mut consumed = [0; 3];
            for (slot, &t) in consumed.iter_mut().zip(all.iter().filter(|&&t| t != id)) {
                *slot = t;
            }
            Meld::Daiminkan { pai: id, consumed }
        }
    };

    let claimed = matches!(
        meld,
        Meld::Chi { .. } | Meld::Pon { .. } | Meld::Daiminkan { .. }
    );
    if claimed && from == 0 {
        return Err(format!("call {m} claims a tile from its own caller"));
    }

    Ok((meld, from))
}

fn decode_chi(m: u16) -> Result<Meld, String> {
    let t = m >> 10;
    let called = usize::from(t % 3);
    let run = t / 3;
    // 7 possible lowest numbers per suit
    if run >= 3 * 7 {
        return Err(format!("chi base {run} out of range in call {m}"));
    }
    let start = (run / 7 * 9 + run % 7) * 4;
    let tiles = [
        start + ((m >> 3) & 0x3),
        start + 4 + ((m >> 5) & 0x3),
        start + 8 + ((m >> 7) & 0x3),
    ];
    let (pai, consumed) = split_called(tiles, called);
    Ok(Meld::Chi { pai, consumed })
}

/// Kind, called index and the copy left out of the pon (the one added by a
/// kakan).
fn pon_parts(m: u16) -> Result<(u16, usize, u16), String> {
    let t = m >> 9;
    let kind = t / 3;
    if kind >= 34 {
        return Err(format!("pon tile kind {kind} out of range in call {m}"));
    }
    Ok((kind, usize::from(t % 3), (m >> 5) & 0x3))
}

fn pon_tiles(kind: u16, skipped: u16) -> [u16; 3] {
    let mut tiles = [0; 3];
    let copies = (0..4).filter(|&c| c != skipped);
    for (slot, copy) in tiles.iter_mut().zip(copies) {
        *slot = kind * 4 + copy;
    }
    tiles
}

fn split_called(tiles: [u16; 3], called: usize) -> (u16, [u16; 2]) {
    match called {
        0 => (tiles[0], [tiles[1], tiles[2]]),
        1 => (tiles[1], [tiles[0], tiles[2]]),
        _ => (tiles[2], [tiles[0], tiles[1]]),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn names(ids: &[u16]) -> Vec<String> {
        ids.iter()
            .map(|&id| tile(id, true).unwrap().to_string())
            .collect()
    }

    #[test]
    fn tile_ids() {
        assert_eq!(tile(0, true).unwrap().to_string(), "1m");
        assert_eq!(tile(16, true).unwrap().to_string(), "5mr");
        assert_eq!(tile(16, false).unwrap().to_string(), "5m");
        assert_eq!(tile(17, true).unwrap().to_string(), "5m");
        assert_eq!(tile(52, true).unwrap().to_string(), "5pr");
        assert_eq!(tile(88, true).unwrap().to_string(), "5sr");
        assert_eq!(tile(108, true).unwrap().to_string(), "E");
        assert_eq!(tile(135, true).unwrap().to_string(), "C");
        assert_eq!(tile(136, true), Some(Tile::UNKNOWN));
        assert!(tile(137, true).is_none());
    }

    #[test]
    fn chi() {
        let (meld, from) = decode_meld(7631).unwrap();
        assert_eq!(from, 3);
        assert_eq!(meld, Meld::Chi { pai: 14, consumed: [9, 19] });
        assert_eq!(names(&[9, 14, 19]), ["3m", "4m", "5m"]);
    }

    #[test]
    fn pon() {
        let (meld, from) = decode_meld(37898).unwrap();
        assert_eq!(from, 2);
        assert_eq!(meld, Meld::Pon { pai: 99, consumed: [97, 98] });
    }

    #[test]
    fn kakan() {
        let (meld, from) = decode_meld(41585).unwrap();
        assert_eq!(from, 1);
        assert_eq!(meld, Meld::Kakan { pai: 111, consumed: [108, 109, 110] });
    }

    #[test]
    fn kans() {
        let (meld, from) = decode_meld(17923).unwrap();
        assert_eq!(from, 3);
        assert_eq!(meld, Meld::Daiminkan { pai: 70, consumed: [68, 69, 71] });

        let (meld, from) = decode_meld(22528).unwrap();
        assert_eq!(from, 0);
        assert_eq!(meld, Meld::Ankan { consumed: [88, 89, 90, 91] });
        assert_eq!(names(&[88, 89]), ["5sr", "5s"]);
    }

    #[test]
    fn invalid_calls() {
        assert!(decode_meld(64519).is_err());
        assert!(decode_meld(30752).is_err());
        // a chi claimed from nobody
        assert!(decode_meld(7631 & !0x3).is_err());
        // kan tile id 200
        assert!(decode_meld((200 << 8) | 3).is_err());
    }
}
