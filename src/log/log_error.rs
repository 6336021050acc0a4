use std::io;

use thiserror::Error;

use crate::log::sink_kind::SinkKind;

/// Errors from binding a sink with [`Logger::open`](crate::log::Logger::open).
///
/// Both are non-fatal: no logger state is changed and the caller may retry.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("invalid sink kind: {0}")]
    InvalidSinkKind(SinkKind),
    #[error("cannot open log file: {0}")]
    Io(#[from] io::Error),
}

/// Errors from emitting a record.
#[derive(Debug, Error)]
pub enum LogError {
    /// No sink has been bound yet.
    #[error("logger used before open")]
    NotInitialized,
    #[error("sink lock poisoned")]
    Poisoned,
    #[error("sink write failed: {0}")]
    Io(#[from] io::Error),
}
