use std::{fmt, str::FromStr};

/// Severity of a log record, and the type of the logger threshold.
///
/// Smaller numeric values are higher priority. `Empty` is only meaningful as a
/// threshold ("logging disabled"); `Info` is a sentinel that is always emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Threshold value that disables everything except `Info`.
    Empty = 0,
    /// Unrecoverable conditions.
    Critical = 1,
    /// Failures the process can continue past.
    Error = 2,
    /// Potentially harmful situations.
    Warning = 3,
    /// Diagnostic detail.
    Debug = 4,
    /// Very fine-grained detail.
    Trace = 5,
    /// Always emitted, regardless of the threshold.
    Info = 127,
}

/// Returns whether a record of `severity` passes `threshold`.
///
/// Pure: no logger state involved.
#[must_use]
pub const fn is_enabled(severity: Severity, threshold: Severity) -> bool {
    match severity {
        Severity::Info => true,
        Severity::Empty => false,
        _ => (severity as u8) <= (threshold as u8),
    }
}

impl Severity {
    /// Numeric value of the level.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// One step toward `Trace`, saturating. `Info` is not a threshold and is returned unchanged.
    #[must_use]
    pub const fn more_verbose(self) -> Self {
        match self {
            Self::Empty => Self::Critical,
            Self::Critical => Self::Error,
            Self::Error => Self::Warning,
            Self::Warning => Self::Debug,
            Self::Debug | Self::Trace => Self::Trace,
            Self::Info => Self::Info,
        }
    }

    /// One step toward `Empty`, saturating. `Info` is returned unchanged.
    #[must_use]
    pub const fn less_verbose(self) -> Self {
        match self {
            Self::Empty | Self::Critical => Self::Empty,
            Self::Error => Self::Critical,
            Self::Warning => Self::Error,
            Self::Debug => Self::Warning,
            Self::Trace => Self::Debug,
            Self::Info => Self::Info,
        }
    }

    /// Decodes a stored threshold. Out-of-range values clamp to `Trace`.
    pub(crate) const fn from_threshold_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Empty,
            1 => Self::Critical,
            2 => Self::Error,
            3 => Self::Warning,
            4 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

/// Error returned when a value does not name a severity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid severity: {0:?}")]
pub struct InvalidSeverity(pub String);

impl TryFrom<u8> for Severity {
    type Error = InvalidSeverity;

    fn try_from(value: u8) -> Result<Self, InvalidSeverity> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Critical),
            2 => Ok(Self::Error),
            3 => Ok(Self::Warning),
            4 => Ok(Self::Debug),
            5 => Ok(Self::Trace),
            127 => Ok(Self::Info),
            other => Err(InvalidSeverity(other.to_string())),
        }
    }
}

impl FromStr for Severity {
    type Err = InvalidSeverity;

    /// Accepts either the numeric level or its name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::try_from(n).map_err(|_| InvalidSeverity(s.to_owned()));
        }
        match s.to_ascii_lowercase().as_str() {
            "empty" | "none" => Ok(Self::Empty),
            "critical" | "crit" => Ok(Self::Critical),
            "error" | "err" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "info" => Ok(Self::Info),
            _ => Err(InvalidSeverity(s.to_owned())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}
