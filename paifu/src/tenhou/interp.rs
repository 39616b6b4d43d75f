use super::json_scheme::{ActionItem, RawKyoku, ResultItem};
use super::naki::{self, Discard};
use super::tile::{tile, TSUMOGIRI};
use crate::builder::{round_of, RecordBuilder, RoundHeader};
use crate::error::{ParseError, Position, Result};
use crate::record::{RyukyokuKind, Win};
use crate::{Event, Tile};

use std::iter::Peekable;
use std::vec::IntoIter;

use serde_json::Value;

/// A decoded column item and its index in the column.
type Column<T> = Peekable<IntoIter<(usize, T)>>;

/// Replays one round of the `log` array into `builder`.
pub(super) struct KyokuReplay<'a> {
    builder: &'a mut RecordBuilder,
    index: usize,
    kyoku: &'a RawKyoku,
}

impl<'a> KyokuReplay<'a> {
    pub(super) fn new(builder: &'a mut RecordBuilder, index: usize, kyoku: &'a RawKyoku) -> Self {
        Self {
            builder,
            index,
            kyoku,
        }
    }

    fn pos(&self, field: impl Into<String>) -> Position {
        Position::field(self.index, field)
    }

    fn tile(&self, code: u32, field: impl FnOnce() -> String) -> Result<Tile> {
        tile(code).ok_or_else(|| {
            ParseError::encoding(&self.pos(field()), format_args!("tile code {code} out of range"))
        })
    }

    pub(super) fn run(mut self) -> Result<()> {
        let kyoku = self.kyoku;
        let meta = kyoku.meta;
        let tables = kyoku.action_tables();

        let mut tehais = [[Tile::UNKNOWN; 13]; 4];
        for (p, (tehai, table)) in tehais.iter_mut().zip(&tables).enumerate() {
            if table.haipai.len() != 13 {
                return Err(ParseError::malformed(
                    &self.pos(format!("haipai[{p}]")),
                    format_args!("{} tiles dealt, expected 13", table.haipai.len()),
                ));
            }
            for (i, (slot, &code)) in tehai.iter_mut().zip(table.haipai).enumerate() {
                *slot = self.tile(code, || format!("haipai[{p}][{i}]"))?;
            }
        }

        let mut dora_feed = kyoku
            .dora_indicators
            .iter()
            .enumerate()
            .map(|(i, &code)| self.tile(code, || format!("dora[{i}]")))
            .collect::<Result<Vec<_>>>()?
            .into_iter();
        let dora_marker = dora_feed
            .next()
            .ok_or_else(|| ParseError::malformed(&self.pos("dora"), "no dora indicator"))?;

        let mut takes = Vec::with_capacity(4);
        let mut discards = Vec::with_capacity(4);
        for (actor, table) in (0..4).zip(&tables) {
            takes.push(self.takes(actor, table.takes)?);
            discards.push(self.discards(actor, table.discards)?);
        }

        let (bakaze, kyoku) = round_of(meta.kyoku_num).ok_or_else(|| {
            ParseError::encoding(
                &self.pos("meta[0]"),
                format_args!("kyoku index {} out of range", meta.kyoku_num),
            )
        })?;
        let oya = meta.kyoku_num % 4;
        let header = RoundHeader {
            bakaze,
            kyoku,
            honba: meta.honba,
            kyotaku: meta.kyotaku,
            oya,
            scores: self.kyoku.scoreboard,
            dora_marker,
            tehais,
        };
        let meta_pos = self.pos("meta");
        self.builder.open_round(header, &meta_pos)?;

        let mut reach_pending = None;
        let mut last_tsumo = Tile::UNKNOWN;
        let mut need_new_dora = false;

        let mut actor = usize::from(oya);
        loop {
            let Some((i, take)) = takes[actor].next() else {
                let len = self.kyoku.action_tables()[actor].takes.len();
                return Err(ParseError::malformed(
                    &self.pos(format!("takes[{actor}][{len}]")),
                    "no draw left for the player in turn",
                ));
            };
            let take_pos = self.pos(format!("takes[{actor}][{i}]"));

            if let Event::Tsumo { pai, .. } = take {
                last_tsumo = pai;
            }

            if let Some(reacher) = reach_pending.take() {
                self.builder
                    .push(Event::ReachAccepted { actor: reacher }, &take_pos)?;
            }

            // a daiminkan leaves a placeholder in the discard column and is
            // followed by the rinshan draw of the same player
            if let Event::Daiminkan { .. } = take {
                self.builder.push(take, &take_pos)?;
                need_new_dora = true;
                discards[actor].next();
                continue;
            }

            self.builder.push(take, &take_pos)?;

            // no discard left: tsumo or an abortive draw on the player's turn
            let Some((j, discard)) = discards[actor].next() else {
                return self.settle(reach_pending, &take_pos);
            };
            let discard_pos = self.pos(format!("discards[{actor}][{j}]"));
            let actor_u8 = actor as u8;
            let fill = |pai: Option<Tile>| Event::Dahai {
                actor: actor_u8,
                pai: pai.unwrap_or(last_tsumo),
                tsumogiri: pai.is_none(),
            };
            let kan = match discard {
                Discard::Dahai(pai) => {
                    self.builder.push(fill(pai), &discard_pos)?;
                    None
                }
                Discard::Reach(pai) => {
                    self.builder
                        .push(Event::Reach { actor: actor_u8 }, &discard_pos)?;
                    self.builder.push(fill(pai), &discard_pos)?;
                    reach_pending = Some(actor_u8);
                    None
                }
                Discard::Kan(ev) => {
                    self.builder.push(ev.clone(), &discard_pos)?;
                    Some(ev)
                }
            };

            // a minkan reveals its dora after the next discard or kan
            if need_new_dora {
                self.reveal_dora(&mut dora_feed, &discard_pos)?;
                need_new_dora = false;
            }

            // no draw left for anybody: ron, or an exhaustive or abortive draw
            if takes.iter_mut().all(|t| t.peek().is_none()) {
                return self.settle(reach_pending, &discard_pos);
            }

            match kan {
                Some(Event::Ankan { .. }) => {
                    self.reveal_dora(&mut dora_feed, &discard_pos)?;
                    continue;
                }
                Some(_) => {
                    need_new_dora = true;
                    continue;
                }
                None => (),
            }

            // whoever calls the discard takes the turn, otherwise shimocha
            actor = (0..4)
                .filter(|&p| p != actor)
                .find(|&p| {
                    takes[p]
                        .peek()
                        .and_then(|(_, ev)| ev.naki_target())
                        .is_some_and(|target| usize::from(target) == actor)
                })
                .unwrap_or((actor + 1) % 4);
        }
    }

    fn reveal_dora(&mut self, feed: &mut IntoIter<Tile>, pos: &Position) -> Result<()> {
        let dora_marker = feed
            .next()
            .ok_or_else(|| ParseError::malformed(&self.pos("dora"), "too few dora indicators"))?;
        self.builder.push(Event::Dora { dora_marker }, pos)
    }

    fn takes(&self, actor: u8, items: &[ActionItem]) -> Result<Column<Event>> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let field = || format!("takes[{actor}][{i}]");
            let ev = match item {
                ActionItem::Code(code) => Event::Tsumo {
                    actor,
                    pai: self.tile(*code, field)?,
                },
                ActionItem::Naki(s) => naki::decode_take(actor, s)
                    .map_err(|e| ParseError::encoding(&self.pos(field()), e))?,
            };
            out.push((i, ev));
        }
        Ok(out.into_iter().peekable())
    }

    fn discards(&self, actor: u8, items: &[ActionItem]) -> Result<Column<Discard>> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let field = || format!("discards[{actor}][{i}]");
            let discard = match item {
                ActionItem::Code(TSUMOGIRI) => Discard::Dahai(None),
                ActionItem::Code(code) => Discard::Dahai(Some(self.tile(*code, field)?)),
                ActionItem::Naki(s) => naki::decode_discard(actor, s)
                    .map_err(|e| ParseError::encoding(&self.pos(field()), e))?,
            };
            out.push((i, discard));
        }
        Ok(out.into_iter().peekable())
    }

    /// Settles the round from its `results` field.
    fn settle(&mut self, reach_pending: Option<u8>, pos: &Position) -> Result<()> {
        let kyoku = self.kyoku;
        let results = &kyoku.results;
        let results_pos = self.pos("results");
        let Some(ResultItem::Status(status)) = results.first() else {
            return Err(ParseError::malformed(&results_pos, "round result lacks a status"));
        };

        if status == "和了" {
            let ura_markers = kyoku
                .ura_indicators
                .iter()
                .enumerate()
                .map(|(i, &code)| self.tile(code, || format!("ura[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            let details = &results[1..];
            if details.is_empty() || details.len() % 2 != 0 {
                return Err(ParseError::malformed(
                    &results_pos,
                    "win without score deltas and details",
                ));
            }
            for (n, pair) in details.chunks_exact(2).enumerate() {
                let win_pos = self.pos(format!("results[{}]", 2 * n + 2));
                let [ResultItem::ScoreDeltas(deltas), ResultItem::HoraDetail(detail)] = pair else {
                    return Err(ParseError::malformed(&win_pos, "expected score deltas then details"));
                };
                let win = hora_detail(detail, *deltas).map_err(|e| ParseError::encoding(&win_pos, e))?;
                self.builder.settle_win(win, ura_markers.clone(), pos)?;
            }
            return Ok(());
        }

        let kind = match status.as_str() {
            "流局" | "全員聴牌" | "全員不聴" => RyukyokuKind::Exhaustive,
            "流し満貫" => RyukyokuKind::NagashiMangan,
            "九種九牌" => RyukyokuKind::KyushuKyuhai,
            "四家立直" => RyukyokuKind::SuuchaRiichi,
            "三家和了" => RyukyokuKind::SanchaHo,
            "四槓散了" => RyukyokuKind::SuukanSanra,
            "四風連打" => RyukyokuKind::SuufonRenda,
            "不明" => RyukyokuKind::Unknown,
            other => {
                self.builder.unknown(&results_pos, other)?;
                RyukyokuKind::Unknown
            }
        };
        let deltas = match results.get(1) {
            Some(ResultItem::ScoreDeltas(deltas)) => *deltas,
            _ => [0; 4],
        };

        // a riichi discard that nobody rons is accepted before the draw
        if let Some(actor) = reach_pending {
            self.builder.push(Event::ReachAccepted { actor }, pos)?;
        }
        self.builder.settle_draw(kind, deltas, pos)
    }
}

/// Reads `[who, from_who, pao_who, ...]`.
fn hora_detail(detail: &[Value], deltas: [i32; 4]) -> std::result::Result<Win, String> {
    let player = |i: usize, what: &str| {
        detail
            .get(i)
            .and_then(Value::as_u64)
            .and_then(|n| u8::try_from(n).ok())
            .filter(|&n| n < 4)
            .ok_or_else(|| format!("invalid {what} in win details"))
    };
    let actor = player(0, "winner")?;
    let target = player(1, "discarder")?;
    let pao = match detail.get(2) {
        Some(Value::Number(_)) => Some(player(2, "pao player")?).filter(|&p| p != actor),
        _ => None,
    };
    Ok(Win {
        actor,
        target,
        pao,
        deltas,
    })
}
