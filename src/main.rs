mod logger;
mod opts;

use opts::{Format, Options};

use std::fs::{self, File};
use std::io::{self, prelude::*, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use paifu::{KyokuFilter, ParseOptions, Record};

fn main() -> Result<()> {
    let opts = Options::parse();
    logger::init(opts.verbose).context("failed to install logger")?;

    let Options {
        input_opts,
        output_opts,
        lenient,
        kyokus,
        ..
    } = opts;

    let kyoku_filter = kyokus
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<KyokuFilter>)
        .transpose()
        .context("failed to parse --kyokus")?;

    // read the whole log, from a file or from stdin
    let in_file = input_opts.in_file.as_deref().filter(|p| *p != Path::new("-"));
    let text = match in_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read log file {path:?}"))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read log from stdin")?;
            text
        }
    };
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let Some(format) = input_opts.format.or_else(|| Format::guess(text)) else {
        bail!("cannot tell the log format, please specify --format");
    };

    let begin_parse = chrono::Local::now();
    info!("parsing {format} log...");
    let parse_opts = ParseOptions { strict: !lenient };
    let mut record = match format {
        Format::Mjlog => paifu::parse_mjlog_with(text, &parse_opts),
        Format::Tenhou6 => paifu::parse_tenhou6_with(text, &parse_opts),
    }
    .with_context(|| format!("failed to parse {format} log"))?;
    debug!(
        "parsed {} rounds in {:?}",
        record.rounds.len(),
        (chrono::Local::now() - begin_parse).to_std()?,
    );

    if let Some(filter) = &kyoku_filter {
        record.filter_rounds(filter);
    }
    if output_opts.anonymous {
        record.hide_names();
    }

    // prepare output, can be a file or stdout
    let out_file = output_opts.out_file.as_deref().filter(|p| *p != Path::new("-"));
    let out: Box<dyn Write> = match out_file {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create out file {path:?}"))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut out = BufWriter::new(out);

    write_output(&mut out, &record, output_opts.mjai).context("failed to write output")?;
    out.flush().context("failed to flush output")?;

    info!("done");
    Ok(())
}

fn write_output(w: &mut impl Write, record: &Record, mjai: bool) -> Result<()> {
    if mjai {
        for event in record.to_mjai_events() {
            serde_json::to_writer(&mut *w, &event)?;
            writeln!(w)?;
        }
    } else {
        serde_json::to_writer_pretty(&mut *w, record)?;
        writeln!(w)?;
    }
    Ok(())
}
