pub mod crash_report;
pub mod facade;
pub mod log_error;
pub mod log_macros;
pub mod log_sink;
pub mod logger;
pub mod memory_log_sink;
pub mod severity;
pub mod sink_kind;

pub use crash_report::{report_crash, with_crash_reporting};
pub use facade::install_facade;
pub use log_error::{LogError, OpenError};
pub use log_sink::{ConsoleSink, FileSink, LogSink};
pub use logger::{Logger, global};
pub use memory_log_sink::MemorySink;
pub use severity::{Severity, is_enabled};
pub use sink_kind::SinkKind;
