#![allow(dead_code)]

pub struct TestCase {
    pub desc: &'static str,
    pub data: &'static str,
}

/// The same three-round hanchan in both formats: a riichi ron, a round with
/// every kind of kan ending in tsumo, and a 九種九牌 that ends the game.
pub const GOLDEN_MJLOG: TestCase = TestCase {
    desc: "golden_mjlog",
    data: include_str!("golden.xml"),
};

pub const GOLDEN_TENHOU6: TestCase = TestCase {
    desc: "golden_tenhou6",
    data: include_str!("golden.json"),
};

/// Six rounds in both formats: a riichi discard that is called, a double
/// ron, a pao tsumo, then nagashi mangan, 流局, 全員聴牌 and 四家立直.
pub const MIXED_ENDINGS_MJLOG: TestCase = TestCase {
    desc: "mixed_endings_mjlog",
    data: include_str!("mixed_endings.xml"),
};

pub const MIXED_ENDINGS_TENHOU6: TestCase = TestCase {
    desc: "mixed_endings_tenhou6",
    data: include_str!("mixed_endings.json"),
};

pub const TENHOU6: &[TestCase] = &[
    GOLDEN_TENHOU6,
    TestCase {
        desc: "unknown_ryukyoku",
        data: r#"{"title":["",""],"name":["","","",""],"rule":{"aka":1},"log":[[[4,0,0],[25000,25000,25000,25000],[47],[],[12,14,51,16,22,24,31,53,36,37,16,18,44],[42,"c171618",47,33,46,32,47,47,19,45,21,27,22],[44,31,60,60,60,60,60,60,60,60,60,42],[11,11,11,11,11,11,11,11,11,11,11,11,11],[11,11,11,29,43,11,26,11,11,11,18,38],[41,44,29,60,60,12,60,46,15,31,60,60],[11,11,11,11,11,11,11,11,11,11,11,11,11],[11,41,11,32,31,11,16,11,11,13,11,17],[41,60,11,60,60,42,60,37,45,60,"r35",60],[11,11,11,11,11,11,11,11,11,11,11,11,11],[11,11,11,11,27,11,11,11,11,11,11,11],[17,43,44,28,60,38,32,35,31,41,11,11],["不明"]]]}"#,
    },
    MIXED_ENDINGS_TENHOU6,
];

pub const MJLOG: &[TestCase] = &[GOLDEN_MJLOG, MIXED_ENDINGS_MJLOG];
