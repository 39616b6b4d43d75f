use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Selects rounds by label, e.g. `"E1,E4,S3.1"` for East-1, East-4 and
/// South-3 with one honba. A label without `.` means honba 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KyokuFilter {
    whitelist: [Vec<u8>; 16],
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty kyoku label")]
    Empty,
    #[error(r#"invalid bakaze: {0:?} (expected one of "E", "S", "W", "N")"#)]
    InvalidBakaze(char),
    #[error("missing kyoku number in {0:?}")]
    MissingKyoku(String),
    #[error("invalid kyoku number {0:?} (expected within [1, 4])")]
    InvalidKyoku(char),
    #[error("invalid honba: {0}")]
    InvalidHonba(#[source] ParseIntError),
}

impl FromStr for KyokuFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut filter = Self::default();
        for label in s.split(',').map(str::trim) {
            let (kyoku, honba) = parse_label(label)?;
            filter.whitelist[usize::from(kyoku)].push(honba);
        }
        Ok(filter)
    }
}

fn parse_label(label: &str) -> Result<(u8, u8), ParseError> {
    let (round, honba) = match label.split_once('.') {
        Some((round, honba)) => (round, honba.parse().map_err(ParseError::InvalidHonba)?),
        None => (label, 0),
    };

    let mut chars = round.chars();
    let wind = chars.next().ok_or(ParseError::Empty)?;
    let offset = match wind.to_ascii_uppercase() {
        'E' => 0,
        'S' => 4,
        'W' => 8,
        'N' => 12,
        _ => return Err(ParseError::InvalidBakaze(wind)),
    };
    let num = chars
        .next()
        .ok_or_else(|| ParseError::MissingKyoku(label.to_owned()))?;
    let trailing = chars.next().is_some();
    let kyoku = match num.to_digit(10) {
        Some(n @ 1..=4) if !trailing => n as u8,
        _ => return Err(ParseError::InvalidKyoku(num)),
    };

    Ok((offset + kyoku - 1, honba))
}

impl KyokuFilter {
    /// `kyoku` is the index in `0..16`, `E1` being 0.
    #[inline]
    #[must_use]
    pub fn test(&self, kyoku: u8, honba: u8) -> bool {
        self.whitelist
            .get(usize::from(kyoku))
            .is_some_and(|honbas| honbas.contains(&honba))
    }
}
