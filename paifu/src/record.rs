use crate::error::Warning;
use crate::{KyokuFilter, Tile};

use serde::Serialize;

/// A fully decoded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub meta: GameMeta,
    pub rounds: Vec<Round>,
    /// Scores after the settlement of the last round.
    pub final_scores: [i32; 4],
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Mjlog,
    Tenhou6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameLength {
    Hanchan = 0,
    Tonpuu = 4,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameMeta {
    pub format: SourceFormat,
    pub names: [String; 4],
    pub game_length: GameLength,
    pub has_aka: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lobby: Option<i32>,
}

/// One hand, from the deal to its settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    pub bakaze: Tile,
    /// Counts from 1.
    pub kyoku: u8,
    pub honba: u8,
    pub kyotaku: u8,
    pub oya: u8,
    /// Scores at the deal.
    pub scores: [i32; 4],
    pub dora_marker: Tile,
    pub tehais: [[Tile; 13]; 4],
    pub events: Vec<Event>,
    pub end: RoundEnd,
    /// Drawable tiles left in the live wall when the round ended.
    pub tiles_left: u8,
}

impl Round {
    /// Sum of every settlement payment of the round.
    #[must_use]
    pub fn deltas(&self) -> [i32; 4] {
        match &self.end {
            RoundEnd::Hora { wins, .. } => wins.iter().fold([0; 4], |mut acc, win| {
                acc.iter_mut().zip(win.deltas).for_each(|(a, d)| *a += d);
                acc
            }),
            RoundEnd::Ryukyoku { deltas, .. } => *deltas,
        }
    }

    /// Kyoku index in `0..16`, `E1` being 0 and `N4` being 15.
    #[must_use]
    pub fn kyoku_index(&self) -> u8 {
        (self.bakaze.as_u8() - Tile::EAST.as_u8()) * 4 + self.kyoku - 1
    }

    /// A short label such as `E1-0` or `S3-2`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}-{}", self.bakaze, self.kyoku, self.honba)
    }

    #[must_use]
    pub fn discard_count(&self, actor: u8) -> usize {
        self.events
            .iter()
            .filter(|ev| matches!(ev, Event::Dahai { actor: a, .. } if *a == actor))
            .count()
    }
}

/// A single in-round action, in turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Tsumo {
        actor: u8,
        pai: Tile,
    },
    Dahai {
        actor: u8,
        pai: Tile,
        tsumogiri: bool,
    },

    Chi {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 2],
    },
    Pon {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 2],
    },
    Daiminkan {
        actor: u8,
        target: u8,
        pai: Tile,
        consumed: [Tile; 3],
    },
    Kakan {
        actor: u8,
        pai: Tile,
        consumed: [Tile; 3],
    },
    Ankan {
        actor: u8,
        consumed: [Tile; 4],
    },
    Dora {
        dora_marker: Tile,
    },

    Reach {
        actor: u8,
    },
    ReachAccepted {
        actor: u8,
    },

    Hora {
        actor: u8,
        target: u8,
    },
    Ryukyoku {
        kind: RyukyokuKind,
    },
}

impl Event {
    #[must_use]
    pub const fn actor(&self) -> Option<u8> {
        match *self {
            Self::Tsumo { actor, .. }
            | Self::Dahai { actor, .. }
            | Self::Chi { actor, .. }
            | Self::Pon { actor, .. }
            | Self::Daiminkan { actor, .. }
            | Self::Kakan { actor, .. }
            | Self::Ankan { actor, .. }
            | Self::Reach { actor }
            | Self::ReachAccepted { actor }
            | Self::Hora { actor, .. } => Some(actor),
            Self::Dora { .. } | Self::Ryukyoku { .. } => None,
        }
    }

    /// The discarder a chi, pon or daiminkan claims from.
    #[must_use]
    pub const fn naki_target(&self) -> Option<u8> {
        match *self {
            Self::Chi { target, .. } | Self::Pon { target, .. } | Self::Daiminkan { target, .. } => {
                Some(target)
            }
            _ => None,
        }
    }

    pub(crate) fn is_round_end(&self) -> bool {
        matches!(self, Self::Hora { .. } | Self::Ryukyoku { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEnd {
    /// One entry per winner; a double ron has two.
    Hora { wins: Vec<Win>, ura_markers: Vec<Tile> },
    Ryukyoku { kind: RyukyokuKind, deltas: [i32; 4] },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Win {
    pub actor: u8,
    /// Equal to `actor` for a tsumo.
    pub target: u8,
    /// The player liable under pao, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pao: Option<u8>,
    pub deltas: [i32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RyukyokuKind {
    /// Wall exhausted.
    Exhaustive,
    NagashiMangan,
    KyushuKyuhai,
    SuuchaRiichi,
    SanchaHo,
    SuukanSanra,
    SuufonRenda,
    /// Recorded without a reason.
    Unknown,
}

impl Record {
    /// Keeps only the rounds selected by `filter`.
    pub fn filter_rounds(&mut self, filter: &KyokuFilter) {
        self.rounds
            .retain(|r| filter.test(r.kyoku_index(), r.honba));
    }

    pub fn hide_names(&mut self) {
        self.meta
            .names
            .iter_mut()
            .zip('A'..='D')
            .for_each(|(name, alias)| {
                name.clear();
                name.push(alias);
                name.push_str("さん");
            });
    }
}
