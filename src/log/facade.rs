//! Bridge from the `log` crate facade.
//!
//! Once installed, `log::warn!` and friends are gated and written by a
//! [`Logger`] exactly like its own emit methods.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

use crate::log::{logger::Logger, severity::Severity};

/// Severity used for a `log` crate level. `Info` keeps its always-on meaning.
#[must_use]
pub const fn severity_of(level: Level) -> Severity {
    match level {
        Level::Error => Severity::Error,
        Level::Warn => Severity::Warning,
        Level::Info => Severity::Info,
        Level::Debug => Severity::Debug,
        Level::Trace => Severity::Trace,
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.is_enabled(severity_of(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        let _ = Logger::log(self, severity_of(record.level()), *record.args());
    }

    fn flush(&self) {}
}

/// Registers `logger` as the `log` crate's global logger.
///
/// Filtering is left entirely to the logger's threshold.
///
/// # Errors
/// Returns [`SetLoggerError`] if a `log` logger was already installed.
pub fn install_facade(logger: &'static Logger) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_level() {
        assert_eq!(severity_of(Level::Error), Severity::Error);
        assert_eq!(severity_of(Level::Warn), Severity::Warning);
        assert_eq!(severity_of(Level::Info), Severity::Info);
        assert_eq!(severity_of(Level::Debug), Severity::Debug);
        assert_eq!(severity_of(Level::Trace), Severity::Trace);
    }
}
