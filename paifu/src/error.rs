use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Where in the source a problem was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Position {
    /// mjlog: ordinal of the tag and its byte offset in the text.
    Token { index: usize, offset: u64 },
    /// tenhou6: location reported by the JSON reader.
    LineColumn { line: usize, column: usize },
    /// tenhou6: a field inside the `log` array, e.g. `takes[2][5]` of round 3.
    Field { kyoku: usize, field: String },
    /// tenhou6: a top-level key of the document.
    TopLevel { key: String },
    Eof,
}

impl Position {
    pub(crate) fn field(kyoku: usize, field: impl Into<String>) -> Self {
        Self::Field {
            kyoku,
            field: field.into(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { index, offset } => write!(f, "token #{index} (byte {offset})"),
            Self::LineColumn { line, column } => write!(f, "line {line} column {column}"),
            Self::Field { kyoku, field } => write!(f, "log[{kyoku}].{field}"),
            Self::TopLevel { key } => write!(f, "key {key:?}"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    MalformedInput,
    Encoding,
    UnknownToken,
    Sequence,
    TruncatedInput,
    Unsupported,
}

/// The first fatal problem of a parse.
///
/// Its `Display` output is the whole message meant for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed input at {pos}: {reason}")]
    MalformedInput { pos: Position, reason: String },

    #[error("invalid encoding at {pos}: {reason}")]
    Encoding { pos: Position, reason: String },

    #[error("unknown token {token:?} at {pos}")]
    UnknownToken { pos: Position, token: String },

    #[error("unexpected {token} at {pos} ({state})")]
    Sequence {
        pos: Position,
        token: String,
        state: &'static str,
    },

    #[error("truncated input at {pos}: {reason}")]
    TruncatedInput { pos: Position, reason: String },

    #[error("unsupported log at {pos}: {reason}")]
    Unsupported { pos: Position, reason: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::UnknownToken { .. } => ErrorKind::UnknownToken,
            Self::Sequence { .. } => ErrorKind::Sequence,
            Self::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    #[must_use]
    pub const fn position(&self) -> &Position {
        match self {
            Self::MalformedInput { pos, .. }
            | Self::Encoding { pos, .. }
            | Self::UnknownToken { pos, .. }
            | Self::Sequence { pos, .. }
            | Self::TruncatedInput { pos, .. }
            | Self::Unsupported { pos, .. } => pos,
        }
    }

    pub(crate) fn malformed(pos: &Position, reason: impl fmt::Display) -> Self {
        Self::MalformedInput {
            pos: pos.clone(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encoding(pos: &Position, reason: impl fmt::Display) -> Self {
        Self::Encoding {
            pos: pos.clone(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unsupported(pos: &Position, reason: impl fmt::Display) -> Self {
        Self::Unsupported {
            pos: pos.clone(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn truncated(pos: &Position, reason: impl fmt::Display) -> Self {
        Self::TruncatedInput {
            pos: pos.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A non-fatal observation kept in [`crate::Record::warnings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// An unknown token dropped in lenient mode.
    SkippedToken { pos: Position, token: String },
    /// A token found after the game-end marker.
    TrailingToken { pos: Position, token: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedToken { pos, token } => write!(f, "skipped unknown token {token:?} at {pos}"),
            Self::TrailingToken { pos, token } => {
                write!(f, "ignored {token:?} after the end of game at {pos}")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn message_carries_position() {
        let err = ParseError::encoding(&Position::Token { index: 7, offset: 120 }, "tile id 140");
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(
            err.to_string(),
            "invalid encoding at token #7 (byte 120): tile id 140"
        );

        let err = ParseError::truncated(&Position::field(2, "results"), "no result");
        assert_eq!(err.to_string(), "truncated input at log[2].results: no result");
        assert_eq!(err.position(), &Position::field(2, "results"));
    }
}
