// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Writes log records to stderr so stdout only carries the report.
struct ConsoleLogger;

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Level for the -q / -v command line switches
pub fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
  match (quiet, verbose) {
    (true, _) => LevelFilter::Warn,
    (false, true) => LevelFilter::Debug,
    (false, false) => LevelFilter::Info,
  }
}

fn prefix(level: Level) -> &'static str {
  match level {
    Level::Error => "🔴 error:",
    Level::Warn => "🟠 warning:",
    Level::Info => "🔵",
    Level::Debug => "⚪",
    Level::Trace => "▫️",
  }
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      // Format: "🟠 warning:  Reference and defect cells differ"
      let mut stderr = std::io::stderr().lock();
      let _ = writeln!(stderr, "{}  {}", prefix(record.level()), record.args());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_levels() {
    assert_eq!(level_for(false, false), LevelFilter::Info);
    assert_eq!(level_for(false, true), LevelFilter::Debug);
    assert_eq!(level_for(true, true), LevelFilter::Warn);
  }

  #[test]
  fn test_prefixes_are_distinct() {
    let all = [Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace];
    for (i, a) in all.iter().enumerate() {
      for b in &all[i + 1..] {
        assert_ne!(prefix(*a), prefix(*b));
      }
    }
  }
}
