use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

const ABOUT: &str = r#"🀄️ Decode a Tenhou log (mjlog XML or tenhou.net/6 JSON) into one structured game record.

Basic usage:
  $ paifu -i 2019050417gm-0029-0000-4f2a8622.xml -o record.json
  $ paifu --format tenhou6 --mjai < log.json"#;

#[derive(Debug, Parser)]
#[clap(version, about = ABOUT)]
pub struct Options {
    #[clap(flatten, next_help_heading = "Input Options")]
    pub input_opts: InputOptions,

    #[clap(flatten, next_help_heading = "Output Options")]
    pub output_opts: OutputOptions,

    /// Skip unknown tags, keys and result strings with a warning instead of
    /// failing.
    #[clap(long)]
    pub lenient: bool,

    /// Kyokus to keep. If absent, keep all kyokus. Example: "E1,E4,S3.1",
    /// which means to keep East-1, East-4, and South-3-1.
    #[clap(short, long, value_name = "LIST")]
    pub kyokus: Option<String>,

    /// Print verbose logs.
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct InputOptions {
    /// The log file to read. If FILE is "-" or absent, read from stdin.
    #[clap(short, long, value_name = "FILE")]
    pub in_file: Option<PathBuf>,

    /// The format of the input. If absent, it is guessed from the first
    /// non-blank character ("<" for mjlog, "{" for tenhou6).
    #[clap(short, long, value_enum)]
    pub format: Option<Format>,
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// The file to write. If FILE is "-" or absent, write to stdout.
    #[clap(short, long, value_name = "FILE")]
    pub out_file: Option<PathBuf>,

    /// Write mjai events, one JSON object per line, instead of the record.
    #[clap(long)]
    pub mjai: bool,

    /// Replace player names with "Aさん" to "Dさん".
    #[clap(long)]
    pub anonymous: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Mjlog,
    Tenhou6,
}

impl Format {
    pub fn guess(text: &str) -> Option<Self> {
        match text.trim_start().chars().next()? {
            '<' => Some(Self::Mjlog),
            '{' => Some(Self::Tenhou6),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mjlog => "mjlog",
            Self::Tenhou6 => "tenhou6",
        };
        fmt::Display::fmt(s, f)
    }
}
