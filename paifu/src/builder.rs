use crate::error::{ParseError, Position, Result, Warning};
use crate::record::{GameMeta, Record, Round, RoundEnd, RyukyokuKind, Win};
use crate::state::{add_points, GameState};
use crate::{Event, ParseOptions, Tile};

use log::{debug, warn};

/// Values known at the deal of a round.
#[derive(Debug, Clone)]
pub(crate) struct RoundHeader {
    pub bakaze: Tile,
    pub kyoku: u8,
    pub honba: u8,
    pub kyotaku: u8,
    pub oya: u8,
    pub scores: [i32; 4],
    pub dora_marker: Tile,
    pub tehais: [[Tile; 13]; 4],
}

/// Prevalent wind and kyoku number of a kyoku index `0..16`, E1 being 0.
pub(crate) fn round_of(kyoku_idx: u8) -> Option<(Tile, u8)> {
    (kyoku_idx < 16).then_some((Tile::wind(kyoku_idx / 4), kyoku_idx % 4 + 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    InRound,
    Settled,
    End,
}

impl Phase {
    const fn describe(self) -> &'static str {
        match self {
            Self::Start => "no round in progress",
            Self::InRound => "round in progress",
            Self::Settled => "round already settled",
            Self::End => "game already ended",
        }
    }

    fn unexpected(self, pos: &Position, token: impl Into<String>) -> ParseError {
        ParseError::Sequence {
            pos: pos.clone(),
            token: token.into(),
            state: self.describe(),
        }
    }
}

#[derive(Debug)]
struct OpenRound {
    header: RoundHeader,
    events: Vec<Event>,
    end: Option<RoundEnd>,
}

/// Accumulates rounds while enforcing the round automaton
/// `Start -> InRound -> Settled -> Start | End`.
#[derive(Debug)]
pub(crate) struct RecordBuilder {
    options: ParseOptions,
    phase: Phase,
    state: GameState,
    current: Option<OpenRound>,
    rounds: Vec<Round>,
    warnings: Vec<Warning>,
}

impl RecordBuilder {
    pub(crate) fn new(options: &ParseOptions) -> Self {
        Self {
            options: *options,
            phase: Phase::Start,
            state: GameState::default(),
            current: None,
            rounds: vec![],
            warnings: vec![],
        }
    }

    #[inline]
    pub(crate) fn is_ended(&self) -> bool {
        self.phase == Phase::End
    }

    #[inline]
    pub(crate) fn rounds_so_far(&self) -> usize {
        self.rounds.len() + usize::from(self.current.is_some())
    }

    pub(crate) fn open_round(&mut self, header: RoundHeader, pos: &Position) -> Result<()> {
        match self.phase {
            Phase::Start | Phase::Settled => (),
            _ => return Err(self.phase.unexpected(pos, "round start")),
        }
        self.close_round();

        debug!(
            "round {}{}-{} opened, oya {}, scores {:?}",
            header.bakaze, header.kyoku, header.honba, header.oya, header.scores
        );
        self.state.deal(header.scores, header.kyotaku);
        self.current = Some(OpenRound {
            header,
            events: vec![],
            end: None,
        });
        self.phase = Phase::InRound;
        Ok(())
    }

    /// Appends an in-round action.
    pub(crate) fn push(&mut self, event: Event, pos: &Position) -> Result<()> {
        if self.phase != Phase::InRound {
            return Err(self.phase.unexpected(pos, format!("{event:?}")));
        }
        debug_assert!(!event.is_round_end());
        check_players(&event, pos)?;

        self.state.apply(&event, pos)?;
        if let Some(round) = &mut self.current {
            round.events.push(event);
        }
        Ok(())
    }

    /// Settles a win. Called again while settled for every further winner of
    /// a multiple ron.
    pub(crate) fn settle_win(&mut self, win: Win, ura_markers: Vec<Tile>, pos: &Position) -> Result<()> {
        let hora = Event::Hora {
            actor: win.actor,
            target: win.target,
        };
        check_players(&hora, pos)?;
        if let Some(pao) = win.pao {
            check_player(pao, pos)?;
        }

        let phase = self.phase;
        let Some(round) = self
            .current
            .as_mut()
            .filter(|_| matches!(phase, Phase::InRound | Phase::Settled))
        else {
            return Err(phase.unexpected(pos, "win"));
        };
        match &mut round.end {
            None => {
                round.end = Some(RoundEnd::Hora {
                    wins: vec![],
                    ura_markers,
                });
            }
            Some(RoundEnd::Hora { ura_markers: ura, .. }) => {
                if ura.is_empty() {
                    *ura = ura_markers;
                }
            }
            Some(RoundEnd::Ryukyoku { .. }) => {
                return Err(ParseError::Sequence {
                    pos: pos.clone(),
                    token: "win".to_owned(),
                    state: "round already ended in a draw",
                });
            }
        }
        if let Some(RoundEnd::Hora { wins, .. }) = &mut round.end {
            let total = wins
                .iter()
                .try_fold(win.deltas, |acc, w| add_points(acc, w.deltas));
            if total.is_none() {
                return Err(ParseError::encoding(pos, "win deltas of the round overflow"));
            }
            debug!("player {} wins from {}: {:?}", win.actor, win.target, win.deltas);
            self.state.settle(win.deltas, true, pos)?;
            round.events.push(hora);
            wins.push(win);
        }
        self.phase = Phase::Settled;
        Ok(())
    }

    pub(crate) fn settle_draw(&mut self, kind: RyukyokuKind, deltas: [i32; 4], pos: &Position) -> Result<()> {
        if self.phase != Phase::InRound {
            return Err(self.phase.unexpected(pos, "draw"));
        }
        self.state.settle(deltas, false, pos)?;
        if let Some(round) = &mut self.current {
            debug!(
                "round ends in {kind:?}: {deltas:?}, {} sticks left",
                self.state.kyotaku()
            );
            round.events.push(Event::Ryukyoku { kind });
            round.end = Some(RoundEnd::Ryukyoku { kind, deltas });
        }
        self.phase = Phase::Settled;
        Ok(())
    }

    pub(crate) fn end_game(&mut self, pos: &Position) -> Result<()> {
        match self.phase {
            Phase::Start | Phase::Settled => (),
            _ => return Err(self.phase.unexpected(pos, "game end")),
        }
        self.close_round();
        debug!("game ended after {} rounds", self.rounds.len());
        self.phase = Phase::End;
        Ok(())
    }

    /// Handles a token the interpreter does not know.
    pub(crate) fn unknown(&mut self, pos: &Position, token: &str) -> Result<()> {
        if self.options.strict {
            return Err(ParseError::UnknownToken {
                pos: pos.clone(),
                token: token.to_owned(),
            });
        }
        self.warn(Warning::SkippedToken {
            pos: pos.clone(),
            token: token.to_owned(),
        });
        Ok(())
    }

    pub(crate) fn trailing(&mut self, pos: &Position, token: &str) {
        self.warn(Warning::TrailingToken {
            pos: pos.clone(),
            token: token.to_owned(),
        });
    }

    fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    fn close_round(&mut self) {
        let Some(OpenRound { header, events, end }) = self.current.take() else {
            return;
        };
        let Some(end) = end else {
            // only reachable from `Phase::Settled`, which always has an end
            return;
        };
        self.rounds.push(Round {
            bakaze: header.bakaze,
            kyoku: header.kyoku,
            honba: header.honba,
            kyotaku: header.kyotaku,
            oya: header.oya,
            scores: header.scores,
            dora_marker: header.dora_marker,
            tehais: header.tehais,
            events,
            end,
            tiles_left: self.state.tiles_left(),
        });
        self.phase = Phase::Start;
    }

    pub(crate) fn finish(self, meta: GameMeta) -> Result<Record> {
        if self.phase != Phase::End {
            let reason = match (&self.current, self.phase) {
                (Some(round), Phase::InRound) => {
                    let h = &round.header;
                    match self.state.actor() {
                        Some(actor) => format!(
                            "input ends inside round {}{}-{}, player {actor} to act",
                            h.bakaze, h.kyoku, h.honba
                        ),
                        None => format!("input ends inside round {}{}-{}", h.bakaze, h.kyoku, h.honba),
                    }
                }
                _ => format!(
                    "no game-end marker after {} complete rounds",
                    self.rounds_so_far()
                ),
            };
            return Err(ParseError::truncated(&Position::Eof, reason));
        }

        Ok(Record {
            meta,
            rounds: self.rounds,
            final_scores: self.state.scores(),
            warnings: self.warnings,
        })
    }
}

fn check_player(player: u8, pos: &Position) -> Result<()> {
    if player < 4 {
        Ok(())
    } else {
        Err(ParseError::encoding(
            pos,
            format_args!("player index {player} out of range"),
        ))
    }
}

fn check_players(event: &Event, pos: &Position) -> Result<()> {
    if let Some(actor) = event.actor() {
        check_player(actor, pos)?;
    }
    if let Some(target) = event.naki_target() {
        check_player(target, pos)?;
    }
    if let Event::Hora { target, .. } = *event {
        check_player(target, pos)?;
    }
    Ok(())
}
