use std::{fmt, str::FromStr};

/// Where formatted lines are written.
///
/// Only `File` and `Console` can be opened; `System` is reserved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SinkKind {
    #[default]
    Undefined,
    System,
    File,
    Console,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log type: {0:?}")]
pub struct UnknownSinkKind(pub String);

impl FromStr for SinkKind {
    type Err = UnknownSinkKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "file" => Ok(Self::File),
            "system" => Ok(Self::System),
            "" | "undefined" => Ok(Self::Undefined),
            other => Err(UnknownSinkKind(other.to_owned())),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::System => write!(f, "system"),
            Self::File => write!(f, "file"),
            Self::Console => write!(f, "console"),
        }
    }
}
