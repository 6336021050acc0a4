use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

/// Destination for fully formatted, timestamped lines.
///
/// `line` never carries the trailing newline; implementations append it.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Writes to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        // Holding the stdout lock keeps concurrent records from interleaving.
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// File permission bits for a newly created log file.
#[cfg(unix)]
pub const LOG_FILE_MODE: u32 = 0o644;

/// Appends to a file that stays open for the life of the sink.
///
/// The file is created if missing and never truncated.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
    path: PathBuf,
}

impl FileSink {
    /// Opens `path` for append, creating it with mode 0644 on unix.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the file cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut opts = OpenOptions::new();
        opts.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(LOG_FILE_MODE);
        }
        let file = opts.open(&path)?;
        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        // A panic mid-write cannot leave the File itself inconsistent.
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        // One write per record so appenders sharing the file don't split lines.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn file_sink_appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.log");
        std::fs::write(&path, "existing\n").unwrap();

        let sink = FileSink::open(&path).unwrap();
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing\nfirst\nsecond\n");
        assert_eq!(sink.path(), path.as_path());
    }

    #[cfg(unix)]
    #[test]
    fn file_sink_creates_with_0644() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.log");
        let _sink = FileSink::open(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        // umask may only remove bits.
        assert_eq!(mode & 0o777 & !LOG_FILE_MODE, 0);
        assert_ne!(mode & 0o600, 0);
    }

    #[test]
    fn file_sink_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/agent.log");
        assert!(FileSink::open(path).is_err());
    }
}
