use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Writes `<time> <file>:<line>\t<message>` lines to stderr.
struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!(
            "{} {}:{}\t{}",
            chrono::Local::now().time(),
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.args(),
        );
    }

    fn flush(&self) {}
}

pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    let level = if verbose { Level::Debug } else { Level::Warn };
    log::set_boxed_logger(Box::new(StderrLogger { level }))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}
