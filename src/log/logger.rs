use crate::{
    config::LogSettings,
    log::{
        log_error::{LogError, OpenError},
        log_sink::{ConsoleSink, FileSink, LogSink},
        severity::{self, Severity},
        sink_kind::SinkKind,
    },
};

use chrono::{DateTime, Local, TimeZone};

use std::{
    fmt,
    path::Path,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicU8, Ordering},
    },
};

/// `chrono` layout of the line prefix: calendar date, then time with microseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

/// Leveled logger with a single sink.
///
/// A `Logger` starts unbound: every emit returns [`LogError::NotInitialized`]
/// until [`open`](Self::open) (or [`open_with_sink`](Self::open_with_sink))
/// succeeds. The threshold is atomic and the sink sits behind a lock, so a
/// `&Logger` can be shared freely between threads. A verbosity change racing
/// an in-flight emit may or may not apply to that record.
///
/// # Architecture
///
/// 1. **Gate**: the record's [`Severity`] is checked against the threshold.
/// 2. **Format**: `<date> <time.micros> <message>` built with `chrono`.
/// 3. **Write**: the line goes to the bound [`LogSink`] as one write.
pub struct Logger {
    threshold: AtomicU8,
    sink: RwLock<Option<Arc<dyn LogSink>>>,
}

static GLOBAL: Logger = Logger::new();

/// The process-wide logger.
#[must_use]
pub fn global() -> &'static Logger {
    &GLOBAL
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold())
            .field("open", &self.is_open())
            .finish()
    }
}

impl Logger {
    /// An unbound logger with threshold `Empty`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            threshold: AtomicU8::new(Severity::Empty.as_u8()),
            sink: RwLock::new(None),
        }
    }

    /// Binds the sink selected by `kind` and sets the threshold to `level`.
    ///
    /// `path` is only used for [`SinkKind::File`]. Calling `open` again replaces
    /// the previous sink; the last call wins.
    ///
    /// # Errors
    /// * [`OpenError::InvalidSinkKind`] for `Undefined` and `System`.
    /// * [`OpenError::Io`] if the log file cannot be opened or created.
    ///
    /// On error, neither the sink nor the threshold changes.
    pub fn open<P: AsRef<Path>>(
        &self,
        kind: SinkKind,
        level: Severity,
        path: P,
    ) -> Result<(), OpenError> {
        let sink: Arc<dyn LogSink> = match kind {
            SinkKind::Console => Arc::new(ConsoleSink),
            SinkKind::File => Arc::new(FileSink::open(path)?),
            other => return Err(OpenError::InvalidSinkKind(other)),
        };
        self.open_with_sink(sink, level);
        Ok(())
    }

    /// Opens the logger as described by parsed configuration.
    ///
    /// # Errors
    /// Same as [`open`](Self::open).
    pub fn open_from_settings(&self, settings: &LogSettings) -> Result<(), OpenError> {
        self.open(settings.kind, settings.level, &settings.file)
    }

    /// Binds a caller-supplied sink. Never fails.
    pub fn open_with_sink(&self, sink: Arc<dyn LogSink>, level: Severity) {
        // The slot only ever holds a whole Option, so a poisoned lock is still usable.
        let mut slot = self.sink.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(sink);
        self.threshold.store(level.as_u8(), Ordering::SeqCst);
    }

    /// Whether a sink is bound.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sink
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Current threshold.
    #[must_use]
    pub fn threshold(&self) -> Severity {
        Severity::from_threshold_bits(self.threshold.load(Ordering::Relaxed))
    }

    /// One step toward `Trace`; stays at `Trace`.
    pub fn increase_verbosity(&self) {
        self.step_threshold(Severity::more_verbose);
    }

    /// One step toward `Empty`; stays at `Empty`.
    pub fn decrease_verbosity(&self) {
        self.step_threshold(Severity::less_verbose);
    }

    fn step_threshold(&self, step: fn(Severity) -> Severity) {
        // The closure always returns Some, so this cannot fail.
        let _ = self
            .threshold
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some(step(Severity::from_threshold_bits(bits)).as_u8())
            });
    }

    /// Gating predicate against the current threshold. See [`severity::is_enabled`].
    #[must_use]
    pub fn is_enabled(&self, level: Severity) -> bool {
        severity::is_enabled(level, self.threshold())
    }

    /// Formats and writes one record if `severity` passes the threshold.
    ///
    /// Suppressed records return `Ok(())` without formatting anything.
    ///
    /// # Errors
    /// * [`LogError::NotInitialized`] if no sink is bound, whatever the severity.
    /// * [`LogError::Poisoned`] if the sink lock is poisoned.
    /// * [`LogError::Io`] if the sink rejects the write.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        let sink = self.bound_sink()?;
        if !self.is_enabled(severity) {
            return Ok(());
        }
        let line = format_line(&Local::now(), args);
        sink.write_line(&line)?;
        Ok(())
    }

    fn bound_sink(&self) -> Result<Arc<dyn LogSink>, LogError> {
        let slot = self.sink.read().map_err(|_| LogError::Poisoned)?;
        slot.as_ref().cloned().ok_or(LogError::NotInitialized)
    }

    /// # Errors
    /// See [`log`](Self::log).
    pub fn critical(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(Severity::Critical, args)
    }

    /// # Errors
    /// See [`log`](Self::log).
    pub fn error(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(Severity::Error, args)
    }

    /// # Errors
    /// See [`log`](Self::log).
    pub fn warning(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(Severity::Warning, args)
    }

    /// # Errors
    /// See [`log`](Self::log).
    pub fn debug(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(Severity::Debug, args)
    }

    /// # Errors
    /// See [`log`](Self::log).
    pub fn trace(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(Severity::Trace, args)
    }

    /// Written regardless of the threshold, even when it is `Empty`.
    ///
    /// # Errors
    /// See [`log`](Self::log).
    pub fn info(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.log(Severity::Info, args)
    }
}

/// Builds `<date> <time.micros> <message>` for `now`.
///
/// Output Format: `2019/06/30 14:05:09.123456 message`
pub fn format_line<Tz>(now: &DateTime<Tz>, args: fmt::Arguments<'_>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{} {}", now.format(TIMESTAMP_FORMAT), args)
}
