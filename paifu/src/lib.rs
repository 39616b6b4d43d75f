//! Parses Tenhou mahjong game logs, both the mjlog XML format and the
//! tenhou.net/6 JSON format, into one canonical [`Record`].
//!
//! ```no_run
//! let text = std::fs::read_to_string("game.xml").unwrap();
//! let record = paifu::parse_mjlog(&text).unwrap();
//! for round in &record.rounds {
//!     println!("{}: {:?}", round.label(), round.deltas());
//! }
//! ```

#![deny(
    rust_2018_idioms,
    let_underscore_drop,
    clippy::uninlined_format_args,
    clippy::unseparated_literal_suffix,
    clippy::must_use_candidate,
    clippy::redundant_else,
    clippy::manual_assert,
    clippy::manual_ok_or,
    clippy::needless_for_each,
    clippy::needless_continue,
    clippy::map_unwrap_or,
    clippy::float_cmp,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::inefficient_to_string,
    clippy::let_unit_value,
    clippy::cloned_instead_of_copied,
    clippy::debug_assert_with_mut_call,
    clippy::equatable_if_let,
    clippy::default_union_representation,
    clippy::explicit_into_iter_loop,
    clippy::explicit_iter_loop,
    clippy::filter_map_next,
    clippy::flat_map_option,
    clippy::lossy_float_literal,
    clippy::implicit_clone,
    clippy::implicit_saturating_sub,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::semicolon_if_nothing_returned,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_lit_as_bytes,
    clippy::trivially_copy_pass_by_ref,
    clippy::unicode_not_nfc,
    clippy::unneeded_field_pattern,
    clippy::unnested_or_patterns,
    clippy::unused_async,
    clippy::useless_let_if_seq,
    clippy::mut_mut,
    clippy::nonstandard_macro_braces,
    clippy::borrow_as_ptr,
    clippy::ptr_as_ptr
)]

mod builder;
mod error;
mod kyoku_filter;
mod options;
mod record;
mod state;
mod tenhou;
mod tile;

pub mod mjai;
pub mod mjlog;

pub use error::{ErrorKind, ParseError, Position, Result, Warning};
pub use kyoku_filter::{KyokuFilter, ParseError as KyokuFilterError};
pub use options::ParseOptions;
pub use record::{Event, GameLength, GameMeta, Record, Round, RoundEnd, RyukyokuKind, SourceFormat, Win};
pub use state::LIVE_WALL_SIZE;
pub use tile::{InvalidTile, Tile};

/// Parses an mjlog XML document with the default (strict) options.
pub fn parse_mjlog(text: &str) -> Result<Record> {
    parse_mjlog_with(text, &ParseOptions::default())
}

/// Parses a tenhou.net/6 JSON document with the default (strict) options.
pub fn parse_tenhou6(text: &str) -> Result<Record> {
    parse_tenhou6_with(text, &ParseOptions::default())
}

pub fn parse_mjlog_with(text: &str, options: &ParseOptions) -> Result<Record> {
    mjlog::parse(text, options)
}

pub fn parse_tenhou6_with(text: &str, options: &ParseOptions) -> Result<Record> {
    tenhou::parse(text, options)
}
