use crate::error::{ParseError, Position, Result};
use crate::Event;

use log::warn;

/// Tiles a four-player round can draw before the wall runs out: 136 tiles
/// minus the 14-tile dead wall and 4 * 13 dealt.
pub const LIVE_WALL_SIZE: u8 = 70;

/// Adds two score tables, `None` on overflow.
pub(crate) fn add_points(a: [i32; 4], b: [i32; 4]) -> Option<[i32; 4]> {
    let mut sum = [0; 4];
    for ((s, x), y) in sum.iter_mut().zip(a).zip(b) {
        *s = x.checked_add(y)?;
    }
    Some(sum)
}

/// Cross-event context reconstructed while replaying a log.
///
/// Only the record builder mutates it, one event at a time and in source
/// order. Scores and sticks carry over from round to round; the first deal
/// seeds them.
#[derive(Debug, Clone, Default)]
pub(crate) struct GameState {
    dealt: bool,
    actor: Option<u8>,
    scores: [i32; 4],
    tiles_left: u8,
    kyotaku: u8,
}

impl GameState {
    /// The player whose turn it is, if the round has started.
    #[inline]
    #[must_use]
    pub(crate) const fn actor(&self) -> Option<u8> {
        self.actor
    }

    #[inline]
    #[must_use]
    pub(crate) const fn scores(&self) -> [i32; 4] {
        self.scores
    }

    #[inline]
    #[must_use]
    pub(crate) const fn tiles_left(&self) -> u8 {
        self.tiles_left
    }

    /// Riichi sticks on the table.
    #[inline]
    #[must_use]
    pub(crate) const fn kyotaku(&self) -> u8 {
        self.kyotaku
    }

    /// Starts a round from the scores and sticks its header announces.
    pub(crate) fn deal(&mut self, scores: [i32; 4], kyotaku: u8) {
        if !self.dealt {
            self.dealt = true;
            self.scores = scores;
            self.kyotaku = kyotaku;
        } else if (scores, kyotaku) != (self.scores, self.kyotaku) {
            warn!(
                "round header has scores {scores:?} and {kyotaku} sticks, running totals are {:?} and {}",
                self.scores, self.kyotaku
            );
        }
        self.actor = None;
        self.tiles_left = LIVE_WALL_SIZE;
    }

    pub(crate) fn apply(&mut self, event: &Event, pos: &Position) -> Result<()> {
        match *event {
            Event::Tsumo { actor, .. } => {
                self.tiles_left =
                    self.tiles_left
                        .checked_sub(1)
                        .ok_or_else(|| ParseError::Sequence {
                            pos: pos.clone(),
                            token: "draw".to_owned(),
                            state: "live wall exhausted",
                        })?;
                self.actor = Some(actor);
            }

            Event::Chi { actor, .. } | Event::Pon { actor, .. } | Event::Daiminkan { actor, .. } => {
                self.actor = Some(actor);
            }

            Event::Dahai { actor, .. }
            | Event::Kakan { actor, .. }
            | Event::Ankan { actor, .. }
            | Event::Reach { actor } => {
                if self.actor != Some(actor) {
                    return Err(ParseError::Sequence {
                        pos: pos.clone(),
                        token: format!("action by player {actor}"),
                        state: "not that player's turn",
                    });
                }
            }

            Event::ReachAccepted { actor } => {
                let score = self.scores[usize::from(actor)];
                self.scores[usize::from(actor)] = score.checked_sub(1000).ok_or_else(|| {
                    ParseError::encoding(pos, format_args!("score {score} of player {actor} out of range"))
                })?;
                self.kyotaku = self
                    .kyotaku
                    .checked_add(1)
                    .ok_or_else(|| ParseError::encoding(pos, "too many riichi sticks"))?;
            }

            Event::Dora { .. } | Event::Hora { .. } | Event::Ryukyoku { .. } => (),
        }

        Ok(())
    }

    pub(crate) fn settle(&mut self, deltas: [i32; 4], won: bool, pos: &Position) -> Result<()> {
        let scores = self.scores;
        self.scores = add_points(scores, deltas).ok_or_else(|| {
            ParseError::encoding(pos, format_args!("deltas {deltas:?} overflow scores {scores:?}"))
        })?;
        if won {
            self.kyotaku = 0;
        }
        Ok(())
    }
}
