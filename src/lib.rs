//! Process-wide leveled logging for agent processes.
//!
//! A [`Logger`](log::Logger) gates records by [`Severity`](log::Severity),
//! writes timestamped lines to a console or file sink, and can wrap a call
//! stack with [`with_crash_reporting`](log::with_crash_reporting) so a panic
//! leaves its payload and backtrace in the log before it continues unwinding.

/// Configuration loading and the `[Logging]` settings.
pub mod config;
/// Severities, sinks, the logger itself and the crash guard.
pub mod log;
