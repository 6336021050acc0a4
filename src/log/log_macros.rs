//! Leveled logging macros over a [`Logger`](crate::log::Logger).
//!
//! Each macro takes the logger followed by `format!`-style arguments. They are
//! fire-and-forget: the emit result is discarded. Call the `Logger` methods
//! directly to observe [`LogError`](crate::log::LogError).
//!
//! ```rust,no_run
//! use agent_log::{logger_warn, log::global};
//!
//! logger_warn!(global(), "queue depth {}", 17);
//! ```

#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $($arg:tt)*) => {{
        let _ = $logger.log($lvl, ::std::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! logger_critical { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::Severity::Critical, $($arg)*) } }
#[macro_export]
macro_rules! logger_error { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::Severity::Error, $($arg)*) } }
#[macro_export]
macro_rules! logger_warn  { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::Severity::Warning, $($arg)*) } }
#[macro_export]
macro_rules! logger_debug { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::Severity::Debug, $($arg)*) } }
#[macro_export]
macro_rules! logger_trace { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::Severity::Trace, $($arg)*) } }
// Not gated by the threshold.
#[macro_export]
macro_rules! logger_info  { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::Severity::Info, $($arg)*) } }
