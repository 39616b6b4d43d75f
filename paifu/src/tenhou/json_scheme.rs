use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use serde_tuple::Deserialize_tuple as DeserializeTuple;

/// Top-level keys that carry nothing a [`crate::Record`] keeps.
pub(super) const IGNORED_KEYS: &[&str] = &[
    "title", "ver", "ref", "ratingc", "dan", "rate", "sx", "sc",
];

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawLog {
    #[serde(rename = "log")]
    pub(super) logs: Vec<RawKyoku>,
    #[serde(rename = "name")]
    pub(super) names: [String; 4],
    #[serde(default)]
    pub(super) rule: Rule,
    #[serde(default)]
    pub(super) lobby: Option<i32>,

    #[serde(flatten)]
    pub(super) extra: BTreeMap<String, Value>,
}

/// An item of a "配牌", "取" or "出" column. Tile codes stay numeric until
/// the interpreter checks them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(super) enum ActionItem {
    Code(u32),
    Naki(String),
}

#[derive(Debug, Clone, DeserializeTuple)]
pub(super) struct RawKyoku {
    pub(super) meta: KyokuMeta,
    pub(super) scoreboard: [i32; 4],
    pub(super) dora_indicators: Vec<u32>,
    pub(super) ura_indicators: Vec<u32>,

    pub(super) haipai_0: Vec<u32>,
    pub(super) takes_0: Vec<ActionItem>,
    pub(super) discards_0: Vec<ActionItem>,

    pub(super) haipai_1: Vec<u32>,
    pub(super) takes_1: Vec<ActionItem>,
    pub(super) discards_1: Vec<ActionItem>,

    pub(super) haipai_2: Vec<u32>,
    pub(super) takes_2: Vec<ActionItem>,
    pub(super) discards_2: Vec<ActionItem>,

    pub(super) haipai_3: Vec<u32>,
    pub(super) takes_3: Vec<ActionItem>,
    pub(super) discards_3: Vec<ActionItem>,

    pub(super) results: Vec<ResultItem>,
}

#[derive(Debug, Clone, Copy, DeserializeTuple)]
pub(super) struct KyokuMeta {
    /// `0..16`, E1 being 0.
    pub(super) kyoku_num: u8,
    pub(super) honba: u8,
    pub(super) kyotaku: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum ResultItem {
    Status(String),
    ScoreDeltas([i32; 4]),
    /// `[who, from_who, pao_who, "30符1飜1000点", yaku...]`
    HoraDetail(Vec<Value>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct Rule {
    pub(super) disp: String,
    pub(super) aka: u8,
    pub(super) aka51: u8,
    pub(super) aka52: u8,
    pub(super) aka53: u8,

    #[serde(flatten)]
    pub(super) extra: BTreeMap<String, Value>,
}

/// One player's columns of a round.
#[derive(Debug, Clone, Copy)]
pub(super) struct ActionTable<'a> {
    pub(super) haipai: &'a [u32],
    pub(super) takes: &'a [ActionItem],
    pub(super) discards: &'a [ActionItem],
}

impl RawKyoku {
    pub(super) fn action_tables(&self) -> [ActionTable<'_>; 4] {
        [
            ActionTable {
                haipai: &self.haipai_0,
                takes: &self.takes_0,
                discards: &self.discards_0,
            },
            ActionTable {
                haipai: &self.haipai_1,
                takes: &self.takes_1,
                discards: &self.discards_1,
            },
            ActionTable {
                haipai: &self.haipai_2,
                takes: &self.takes_2,
                discards: &self.discards_2,
            },
            ActionTable {
                haipai: &self.haipai_3,
                takes: &self.takes_3,
                discards: &self.discards_3,
            },
        ]
    }
}

impl Rule {
    pub(super) fn is_sanma(&self) -> bool {
        self.disp.contains('三') || self.disp.contains("3-Player")
    }

    pub(super) fn is_tonpuu(&self) -> bool {
        self.disp.contains('東') || self.disp.contains("East")
    }

    pub(super) fn has_aka(&self) -> bool {
        [self.aka, self.aka51, self.aka52, self.aka53]
            .iter()
            .any(|&n| n > 0)
    }
}
