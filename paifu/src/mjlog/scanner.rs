use crate::error::{ParseError, Position, Result};

use std::collections::HashMap;
use std::iter::FusedIterator;
use std::str::{self, FromStr};

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::reader::Reader;

/// One start or empty tag of an mjlog document.
#[derive(Debug, Clone)]
pub struct Token {
    pub name: String,
    pub attrs: Attrs,
    pub pos: Position,
}

/// Attribute values of a tag, XML-unescaped. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct Attrs(HashMap<String, String>);

impl Attrs {
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl Token {
    pub(crate) fn require(&self, name: &str) -> Result<&str> {
        self.attrs.get(name).ok_or_else(|| {
            ParseError::malformed(
                &self.pos,
                format_args!("<{}> lacks attribute {name:?}", self.name),
            )
        })
    }

    /// Parses one numeric attribute.
    pub(crate) fn number<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.require(name)?;
        raw.trim().parse().map_err(|e| {
            ParseError::malformed(&self.pos, format_args!("{name}={raw:?}: {e}"))
        })
    }

    /// Parses a comma-separated numeric attribute, if present.
    pub(crate) fn optional_list<T>(&self, name: &str) -> Result<Option<Vec<T>>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.attrs.get(name) else {
            return Ok(None);
        };
        raw.split(',')
            .map(|item| {
                item.trim().parse().map_err(|e| {
                    ParseError::malformed(&self.pos, format_args!("{name}={raw:?}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub(crate) fn list<T>(&self, name: &str) -> Result<Vec<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.require(name)?;
        self.optional_list(name).map(Option::unwrap_or_default)
    }

    /// Like [`Self::list`] but with an exact item count.
    pub(crate) fn array<T, const N: usize>(&self, name: &str) -> Result<[T; N]>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let items = self.list(name)?;
        let len = items.len();
        items.try_into().map_err(|_| {
            ParseError::malformed(
                &self.pos,
                format_args!("{name} has {len} values, expected {N}"),
            )
        })
    }
}

/// Lazily splits an mjlog document into tags.
///
/// End tags, text, comments and declarations are skipped. The first syntax
/// error is yielded once and ends the iteration.
pub struct Scanner<'a> {
    reader: Reader<&'a [u8]>,
    index: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            reader: Reader::from_str(text),
            index: 0,
            done: false,
        }
    }

    fn token(&self, tag: &BytesStart<'_>, pos: Position) -> Result<Token> {
        let name = str::from_utf8(tag.name().as_ref())
            .map_err(|e| ParseError::malformed(&pos, e))?
            .to_owned();

        let mut attrs = HashMap::new();
        for attr in tag.attributes() {
            let attr = attr.map_err(|e| ParseError::malformed(&pos, format_args!("<{name}>: {e}")))?;
            let key = str::from_utf8(attr.key.as_ref())
                .map_err(|e| ParseError::malformed(&pos, e))?
                .to_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::malformed(&pos, format_args!("<{name} {key}>: {e}")))?
                .into_owned();
            attrs.insert(key, value);
        }

        Ok(Token {
            name,
            attrs: Attrs(attrs),
            pos,
        })
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let offset = self.reader.buffer_position() as u64;
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    self.done = true;
                    let pos = Position::Token {
                        index: self.index,
                        offset: self.reader.error_position() as u64,
                    };
                    return Some(Err(ParseError::malformed(&pos, err)));
                }
            };

            match event {
                XmlEvent::Start(tag) | XmlEvent::Empty(tag) => {
                    let pos = Position::Token {
                        index: self.index,
                        offset,
                    };
                    self.index += 1;
                    let token = self.token(&tag, pos);
                    self.done = token.is_err();
                    return Some(token);
                }
                XmlEvent::Eof => self.done = true,
                _ => (),
            }
        }

        None
    }
}

impl FusedIterator for Scanner<'_> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn tags_and_attributes() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<mjloggm ver="2.3"><GO type="169" lobby="0"/><T12/><D12/>
<UN n0="%41" dan="1,2"/></mjloggm>"#;
        let tokens: Vec<_> = Scanner::new(text).collect::<Result<_>>().unwrap();
        let names: Vec<_> = tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["mjloggm", "GO", "T12", "D12", "UN"]);

        assert_eq!(tokens[1].number::<u16>("type").unwrap(), 169);
        assert_eq!(tokens[4].list::<u8>("dan").unwrap(), [1, 2]);
        assert_eq!(tokens[4].attrs.get("n0"), Some("%41"));
        assert_eq!(
            tokens[2].pos,
            Position::Token {
                index: 2,
                offset: text.find("<T12").unwrap() as u64
            }
        );
    }

    #[test]
    fn attribute_helpers() {
        let text = r#"<INIT seed="0,1,0,3,2,100" ten="250,250" hai0=""/>"#;
        let token = Scanner::new(text).next().unwrap().unwrap();
        assert_eq!(token.array::<u16, 6>("seed").unwrap(), [0, 1, 0, 3, 2, 100]);
        assert_eq!(
            token.array::<i32, 4>("ten").unwrap_err().kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(token.list::<u16>("hai0").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(token.require("oya").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert!(token.optional_list::<u16>("hai1").unwrap().is_none());
    }

    #[test]
    fn broken_documents_stop_the_scan() {
        for text in [
            r#"<mjloggm ver="2.3"><T12/><D12"#,
            r#"<mjloggm ver="2.3"><UN n0="a&bogus;"/>"#,
            r#"<mjloggm ver="2.3"><GO type="1" type="2"/>"#,
            r#"<mjloggm ver="2.3"><GO type="1/></mjloggm>"#,
        ] {
            let mut scanner = Scanner::new(text);
            let results: Vec<_> = scanner.by_ref().collect();
            let last = results.last().unwrap();
            assert_eq!(
                last.as_ref().unwrap_err().kind(),
                ErrorKind::MalformedInput,
                "{text}"
            );
            assert!(results[..results.len() - 1].iter().all(Result::is_ok));
            assert!(scanner.next().is_none());
        }
    }
}
