//! Tenhou mjlog XML logs.

mod codec;
mod interp;
mod scanner;

pub use scanner::{Attrs, Scanner, Token};

use crate::error::Result;
use crate::{ParseOptions, Record};
use interp::Interpreter;

use log::debug;

pub(crate) fn parse(text: &str, options: &ParseOptions) -> Result<Record> {
    let mut interp = Interpreter::new(options);
    let mut tokens = 0_usize;

    for token in Scanner::new(text) {
        tokens += 1;
        match token {
            Ok(token) => interp.feed(&token)?,
            // junk after the end of game cannot change the record
            Err(err) if interp.is_ended() => interp.trailing_error(&err),
            Err(err) => return Err(err),
        }
    }

    debug!("mjlog scanned, {tokens} tokens");
    interp.finish()
}
