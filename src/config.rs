use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::log::{Severity, SinkKind};

/// Section holding the logger keys.
pub const LOGGING_SECTION: &str = "Logging";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// INI-style configuration: `[section]` headers, `key = value` lines, `#` comments.
#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    /// Reads and parses `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Parses configuration text. Lines that are neither headers nor assignments are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::empty();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current_section = Some(name.trim().to_string());
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_string();
                let value = value.trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        cfg.globals.insert(key, value);
                    }
                    Some(sec) => {
                        cfg.sections.entry(sec.clone()).or_default().insert(key, value);
                    }
                }
            }
        }
        cfg
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(|s| s.as_str())
    }

    /// Section value, then global value, then `default`.
    #[must_use]
    pub fn get_non_empty_or_default<'a>(
        &'a self,
        section: &str,
        key: &str,
        default: &'a str,
    ) -> &'a str {
        self.get_non_empty(section, key)
            .or_else(|| self.get_global(key).filter(|s| !s.is_empty()))
            .unwrap_or(default)
    }
}

/// Logger settings from the `[Logging]` section.
///
/// | Key | Values | Default |
/// |-----|--------|---------|
/// | `LogType` | `console`, `file`, `system` | `console` |
/// | `DebugLevel` | `0`..`5` | `3` |
/// | `LogFile` | path | empty |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub kind: SinkKind,
    pub level: Severity,
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            kind: SinkKind::Console,
            level: Severity::Warning,
            file: PathBuf::new(),
        }
    }
}

impl LogSettings {
    /// Reads the logging keys, falling back to defaults for missing ones.
    ///
    /// `system` is accepted here and rejected later by `Logger::open`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for an unknown `LogType` or a
    /// `DebugLevel` outside `0..=5`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let kind = match config.get_non_empty(LOGGING_SECTION, "LogType") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LogType",
                value: v.to_owned(),
            })?,
            None => defaults.kind,
        };

        let level = match config.get_non_empty(LOGGING_SECTION, "DebugLevel") {
            Some(v) => parse_debug_level(v)?,
            None => defaults.level,
        };

        let file = PathBuf::from(config.get_non_empty_or_default(LOGGING_SECTION, "LogFile", ""));

        Ok(Self { kind, level, file })
    }
}

/// Only the numeric thresholds `0..=5` are valid; `Info` is not a threshold.
fn parse_debug_level(v: &str) -> Result<Severity, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "DebugLevel",
        value: v.to_owned(),
    };
    let n: u8 = v.trim().parse().map_err(|_| invalid())?;
    match Severity::try_from(n) {
        Ok(Severity::Info) | Err(_) => Err(invalid()),
        Ok(level) => Ok(level),
    }
}
