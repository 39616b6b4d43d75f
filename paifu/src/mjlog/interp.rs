use super::codec::{self, Meld};
use super::scanner::Token;
use crate::builder::{round_of, RecordBuilder, RoundHeader};
use crate::error::{ParseError, Result};
use crate::record::{GameLength, GameMeta, RyukyokuKind, SourceFormat, Win};
use crate::{Event, ParseOptions, Record, Tile};

use log::trace;

const SUPPORTED_VERSION: &str = "2.3";

// bits of <GO type>
const GAME_TYPE_NO_AKA: u16 = 0x02;
const GAME_TYPE_HANCHAN: u16 = 0x08;
const GAME_TYPE_SANMA: u16 = 0x10;

/// Applies mjlog tags, one at a time, to a [`RecordBuilder`].
pub(crate) struct Interpreter {
    builder: RecordBuilder,
    aka: bool,
    game_length: GameLength,
    lobby: Option<i32>,
    names: Option<[String; 4]>,
    /// 136-id of each player's last draw, for telling tsumogiri apart.
    last_draw: [Option<u16>; 4],
}

impl Interpreter {
    pub(crate) fn new(options: &ParseOptions) -> Self {
        Self {
            builder: RecordBuilder::new(options),
            aka: true,
            game_length: GameLength::Hanchan,
            lobby: None,
            names: None,
            last_draw: [None; 4],
        }
    }

    #[inline]
    pub(crate) fn is_ended(&self) -> bool {
        self.builder.is_ended()
    }

    pub(crate) fn trailing(&mut self, token: &Token) {
        self.builder.trailing(&token.pos, &token.name);
    }

    pub(crate) fn trailing_error(&mut self, err: &ParseError) {
        self.builder.trailing(err.position(), &err.to_string());
    }

    pub(crate) fn feed(&mut self, token: &Token) -> Result<()> {
        if self.is_ended() {
            self.trailing(token);
            return Ok(());
        }
        trace!("<{}> {:?}", token.name, token.attrs);

        match token.name.as_str() {
            "mjloggm" => self.version(token),
            "SHUFFLE" | "BYE" => Ok(()),
            "GO" => self.go(token),
            "UN" => self.un(token),
            "TAIKYOKU" => self.taikyoku(token),
            "INIT" => self.init(token),
            "N" => self.naki(token),
            "REACH" => self.reach(token),
            "DORA" => self.dora(token),
            "AGARI" => self.agari(token),
            "RYUUKYOKU" => self.ryuukyoku(token),
            name => match draw_or_discard(name) {
                Some(Ok((kind, actor, id))) => self.tile_action(token, kind, actor, id),
                Some(Err(reason)) => Err(ParseError::encoding(&token.pos, reason)),
                None => self.builder.unknown(&token.pos, name),
            },
        }
    }

    pub(crate) fn finish(self) -> Result<Record> {
        let meta = GameMeta {
            format: SourceFormat::Mjlog,
            names: self.names.unwrap_or_default(),
            game_length: self.game_length,
            has_aka: self.aka,
            lobby: self.lobby,
        };
        self.builder.finish(meta)
    }

    fn tile(&self, token: &Token, id: u16) -> Result<Tile> {
        codec::tile(id, self.aka)
            .ok_or_else(|| ParseError::encoding(&token.pos, format_args!("tile id {id} out of range")))
    }

    fn tiles<const N: usize>(&self, token: &Token, ids: [u16; N]) -> Result<[Tile; N]> {
        let mut tiles = [Tile::UNKNOWN; N];
        for (slot, id) in tiles.iter_mut().zip(ids) {
            *slot = self.tile(token, id)?;
        }
        Ok(tiles)
    }

    fn player(token: &Token, name: &str) -> Result<u8> {
        let who: u8 = token.number(name)?;
        if who >= 4 {
            return Err(ParseError::encoding(
                &token.pos,
                format_args!("{name}={who} is not a player index"),
            ));
        }
        Ok(who)
    }

    fn version(&mut self, token: &Token) -> Result<()> {
        let ver = token.require("ver")?;
        if ver != SUPPORTED_VERSION {
            return Err(ParseError::unsupported(
                &token.pos,
                format_args!("mjloggm ver {ver} (only {SUPPORTED_VERSION} is supported)"),
            ));
        }
        Ok(())
    }

    fn go(&mut self, token: &Token) -> Result<()> {
        let game_type: u16 = token.number("type")?;
        if game_type & GAME_TYPE_SANMA != 0 {
            return Err(ParseError::unsupported(&token.pos, "three-player game"));
        }
        self.aka = game_type & GAME_TYPE_NO_AKA == 0;
        self.game_length = if game_type & GAME_TYPE_HANCHAN != 0 {
            GameLength::Hanchan
        } else {
            GameLength::Tonpuu
        };
        if token.attrs.contains("lobby") {
            self.lobby = Some(token.number("lobby")?);
        }
        Ok(())
    }

    /// Only the first `<UN>` carries the table; later ones are reconnects.
    fn un(&mut self, token: &Token) -> Result<()> {
        if self.names.is_some() {
            return Ok(());
        }
        let mut names: [String; 4] = Default::default();
        for (i, name) in names.iter_mut().enumerate() {
            let raw = token.require(&format!("n{i}"))?;
            *name = urlencoding::decode(raw)
                .map_err(|e| ParseError::malformed(&token.pos, format_args!("n{i}: {e}")))?
                .into_owned();
        }
        self.names = Some(names);
        Ok(())
    }

    fn taikyoku(&mut self, token: &Token) -> Result<()> {
        if self.builder.rounds_so_far() > 0 {
            return Err(ParseError::Sequence {
                pos: token.pos.clone(),
                token: token.name.clone(),
                state: "game already started",
            });
        }
        Ok(())
    }

    fn init(&mut self, token: &Token) -> Result<()> {
        let [kyoku_idx, honba, kyotaku, _, _, dora]: [u16; 6] = token.array("seed")?;
        let small = |name: &str, v: u16| {
            u8::try_from(v).map_err(|_| {
                ParseError::encoding(&token.pos, format_args!("seed {name} {v} out of range"))
            })
        };
        let (bakaze, kyoku) = u8::try_from(kyoku_idx)
            .ok()
            .and_then(round_of)
            .ok_or_else(|| {
                ParseError::encoding(&token.pos, format_args!("seed kyoku {kyoku_idx} out of range"))
            })?;
        let ten: [i32; 4] = token.array("ten")?;
        let mut scores = [0; 4];
        for (score, t) in scores.iter_mut().zip(ten) {
            *score = points(token, "ten", t)?;
        }
        let oya = Self::player(token, "oya")?;

        let mut tehais = [[Tile::UNKNOWN; 13]; 4];
        for (i, tehai) in tehais.iter_mut().enumerate() {
            let ids: [u16; 13] = token.array(&format!("hai{i}"))?;
            *tehai = self.tiles(token, ids)?;
        }

        let header = RoundHeader {
            bakaze,
            kyoku,
            honba: small("honba", honba)?,
            kyotaku: small("kyotaku", kyotaku)?,
            oya,
            scores,
            dora_marker: self.tile(token, dora)?,
            tehais,
        };
        self.last_draw = [None; 4];
        self.builder.open_round(header, &token.pos)
    }

    fn tile_action(&mut self, token: &Token, kind: TileAction, actor: u8, id: u16) -> Result<()> {
        let pai = self.tile(token, id)?;
        let slot = &mut self.last_draw[usize::from(actor)];
        let event = match kind {
            TileAction::Draw => {
                *slot = Some(id);
                Event::Tsumo { actor, pai }
            }
            TileAction::Discard => Event::Dahai {
                actor,
                pai,
                tsumogiri: slot.take() == Some(id),
            },
        };
        self.builder.push(event, &token.pos)
    }

    fn naki(&mut self, token: &Token) -> Result<()> {
        let actor = Self::player(token, "who")?;
        let m: u16 = token.number("m")?;
        let (meld, from) = codec::decode_meld(m).map_err(|e| ParseError::encoding(&token.pos, e))?;
        let target = (actor + from) % 4;

        let event = match meld {
            Meld::Chi { pai, consumed } => Event::Chi {
                actor,
                target,
                pai: self.tile(token, pai)?,
                consumed: self.tiles(token, consumed)?,
            },
            Meld::Pon { pai, consumed } => Event::Pon {
                actor,
                target,
                pai: self.tile(token, pai)?,
                consumed: self.tiles(token, consumed)?,
            },
            Meld::Daiminkan { pai, consumed } => Event::Daiminkan {
                actor,
                target,
                pai: self.tile(token, pai)?,
                consumed: self.tiles(token, consumed)?,
            },
            Meld::Kakan { pai, consumed } => Event::Kakan {
                actor,
                pai: self.tile(token, pai)?,
                consumed: self.tiles(token, consumed)?,
            },
            Meld::Ankan { consumed } => Event::Ankan {
                actor,
                consumed: self.tiles(token, consumed)?,
            },
        };
        if event.naki_target().is_some() {
            self.last_draw[usize::from(actor)] = None;
        }
        self.builder.push(event, &token.pos)
    }

    fn reach(&mut self, token: &Token) -> Result<()> {
        let actor = Self::player(token, "who")?;
        let event = match token.number::<u8>("step")? {
            1 => Event::Reach { actor },
            2 => Event::ReachAccepted { actor },
            step => {
                return Err(ParseError::encoding(
                    &token.pos,
                    format_args!("reach step {step}"),
                ))
            }
        };
        self.builder.push(event, &token.pos)
    }

    fn dora(&mut self, token: &Token) -> Result<()> {
        let dora_marker = self.tile(token, token.number("hai")?)?;
        self.builder.push(Event::Dora { dora_marker }, &token.pos)
    }

    fn agari(&mut self, token: &Token) -> Result<()> {
        let actor = Self::player(token, "who")?;
        let target = Self::player(token, "fromWho")?;
        let pao = if token.attrs.contains("paoWho") {
            Some(Self::player(token, "paoWho")?)
        } else {
            None
        };
        let deltas = deltas(token)?.ok_or_else(|| {
            ParseError::malformed(&token.pos, "<AGARI> lacks attribute \"sc\"")
        })?;
        let ura_markers = token
            .optional_list::<u16>("doraHaiUra")?
            .unwrap_or_default()
            .into_iter()
            .map(|id| self.tile(token, id))
            .collect::<Result<Vec<_>>>()?;

        let win = Win {
            actor,
            target,
            pao,
            deltas,
        };
        self.builder.settle_win(win, ura_markers, &token.pos)?;
        self.maybe_end(token)
    }

    fn ryuukyoku(&mut self, token: &Token) -> Result<()> {
        let kind = match token.attrs.get("type") {
            None => RyukyokuKind::Exhaustive,
            Some("nm") => RyukyokuKind::NagashiMangan,
            Some("yao9") => RyukyokuKind::KyushuKyuhai,
            Some("reach4") => RyukyokuKind::SuuchaRiichi,
            Some("ron3") => RyukyokuKind::SanchaHo,
            Some("kan4") => RyukyokuKind::SuukanSanra,
            Some("kaze4") => RyukyokuKind::SuufonRenda,
            Some(other) => {
                self.builder
                    .unknown(&token.pos, &format!("RYUUKYOKU type={other}"))?;
                RyukyokuKind::Unknown
            }
        };
        let deltas = deltas(token)?.unwrap_or_default();
        self.builder.settle_draw(kind, deltas, &token.pos)?;
        self.maybe_end(token)
    }

    fn maybe_end(&mut self, token: &Token) -> Result<()> {
        if token.attrs.contains("owari") {
            self.builder.end_game(&token.pos)?;
        }
        Ok(())
    }
}

/// Reads `sc="ten0,delta0,ten1,delta1,..."` (in hundreds) into point deltas.
fn deltas(token: &Token) -> Result<Option<[i32; 4]>> {
    let Some(sc) = token.optional_list::<i32>("sc")? else {
        return Ok(None);
    };
    if sc.len() != 8 {
        return Err(ParseError::malformed(
            &token.pos,
            format_args!("sc has {} values, expected 8", sc.len()),
        ));
    }
    let mut deltas = [0; 4];
    for (delta, pair) in deltas.iter_mut().zip(sc.chunks_exact(2)) {
        *delta = points(token, "sc", pair[1])?;
    }
    Ok(Some(deltas))
}

/// Scales a value given in hundreds of points.
fn points(token: &Token, name: &str, hundreds: i32) -> Result<i32> {
    hundreds.checked_mul(100).ok_or_else(|| {
        ParseError::encoding(&token.pos, format_args!("{name} value {hundreds} out of range"))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileAction {
    Draw,
    Discard,
}

/// Recognizes `T`..`W` (draws) and `D`..`G` (discards) followed by a tile id.
fn draw_or_discard(name: &str) -> Option<std::result::Result<(TileAction, u8, u16), String>> {
    let mut chars = name.chars();
    let (kind, actor) = match chars.next()? {
        c @ 'T'..='W' => (TileAction::Draw, c as u8 - b'T'),
        c @ 'D'..='G' => (TileAction::Discard, c as u8 - b'D'),
        _ => return None,
    };
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        digits
            .parse()
            .map(|id| (kind, actor, id))
            .map_err(|_| format!("tile id {digits} out of range")),
    )
}
