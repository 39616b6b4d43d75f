//! tenhou.net/6 JSON logs.

mod interp;
mod json_scheme;
mod naki;
mod tile;

use crate::builder::RecordBuilder;
use crate::error::{ParseError, Position, Result};
use crate::record::{GameLength, GameMeta, SourceFormat};
use crate::{ParseOptions, Record};
use interp::KyokuReplay;
use json_scheme::{RawLog, IGNORED_KEYS};

use log::debug;
use serde_json::{self as json, error::Category};

pub(crate) fn parse(text: &str, options: &ParseOptions) -> Result<Record> {
    let raw_log: RawLog = json::from_str(text).map_err(json_error)?;
    debug!("tenhou6 log with {} rounds", raw_log.logs.len());

    let mut builder = RecordBuilder::new(options);
    for key in raw_log.extra.keys() {
        if !IGNORED_KEYS.contains(&key.as_str()) {
            builder.unknown(&Position::TopLevel { key: key.clone() }, key)?;
        }
    }

    let rule = &raw_log.rule;
    for key in rule.extra.keys() {
        let pos = Position::TopLevel {
            key: format!("rule.{key}"),
        };
        builder.unknown(&pos, key)?;
    }
    if rule.is_sanma() {
        return Err(ParseError::unsupported(
            &Position::TopLevel {
                key: "rule".to_owned(),
            },
            format_args!("three-player game ({:?})", rule.disp),
        ));
    }

    for (index, kyoku) in raw_log.logs.iter().enumerate() {
        KyokuReplay::new(&mut builder, index, kyoku).run()?;
    }
    builder.end_game(&Position::Eof)?;

    let meta = GameMeta {
        format: SourceFormat::Tenhou6,
        names: raw_log.names,
        game_length: if rule.is_tonpuu() {
            GameLength::Tonpuu
        } else {
            GameLength::Hanchan
        },
        has_aka: rule.has_aka(),
        lobby: raw_log.lobby,
    };
    builder.finish(meta)
}

fn json_error(err: json::Error) -> ParseError {
    let pos = Position::LineColumn {
        line: err.line(),
        column: err.column(),
    };
    match err.classify() {
        Category::Eof => ParseError::truncated(&pos, err),
        _ => ParseError::malformed(&pos, err),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ErrorKind, Warning};

    #[test]
    fn json_error_kinds() {
        let opts = ParseOptions::default();
        let err = parse(r#"{"log": [[[0,0,0],"#, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert!(matches!(err.position(), Position::LineColumn { line: 1, .. }));

        let err = parse(r#"{"log": [}"#, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = parse(r#"{"name": ["a","b","c","d"]}"#, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn empty_game() {
        let text = r#"{"title":["",""],"name":["a","b","c","d"],"rule":{"disp":"般東喰","aka":0},"log":[]}"#;
        let record = parse(text, &ParseOptions::default()).unwrap();
        assert!(record.rounds.is_empty());
        assert_eq!(record.meta.game_length, GameLength::Tonpuu);
        assert!(!record.meta.has_aka);
        assert_eq!(record.meta.names[3], "d");
    }

    #[test]
    fn top_level_keys() {
        let text = r#"{"name":["a","b","c","d"],"log":[],"extra":1}"#;
        let err = parse(text, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownToken);
        assert_eq!(
            err.position(),
            &Position::TopLevel {
                key: "extra".to_owned()
            }
        );

        let record = parse(text, &ParseOptions::lenient()).unwrap();
        assert_eq!(record.warnings.len(), 1);

        let text = r#"{"name":["a","b","c","d"],"rule":{"disp":"般南","tobi":0},"log":[]}"#;
        let err = parse(text, &ParseOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownToken {
                pos: Position::TopLevel {
                    key: "rule.tobi".to_owned()
                },
                token: "tobi".to_owned()
            }
        );
        let record = parse(text, &ParseOptions::lenient()).unwrap();
        assert!(matches!(
            record.warnings.as_slice(),
            [Warning::SkippedToken { token, .. }] if token == "tobi"
        ));

        let text = r#"{"name":["a","b","c",""],"rule":{"disp":"三般南"},"log":[]}"#;
        let err = parse(text, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
