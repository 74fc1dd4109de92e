// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

pub fn init(max_level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(max_level))
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let icon = match record.level() {
        Level::Error => "🔴",
        Level::Warn => "🟠",
        Level::Info => "🔵",
        Level::Debug => "⚪",
        Level::Trace => "▫️",
      };

      // Format: "🔴  File not found"
      eprintln!("{}  {}", icon, record.args());
    }
  }

  fn flush(&self) {}
}
