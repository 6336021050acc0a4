use std::path::PathBuf;
use std::process;

use clap::Parser;

use agent_log::config::{Config, LogSettings};
use agent_log::log::{self, Severity, SinkKind};
use agent_log::{logger_critical, logger_debug, logger_error, logger_info, logger_trace, logger_warn};

/// Opens the process logger and writes one record per severity.
#[derive(Debug, Parser)]
#[command(name = "agent_log", version)]
struct Cli {
    /// Configuration file with a [Logging] section.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides LogType (console, file, system).
    #[arg(long)]
    log_type: Option<SinkKind>,

    /// Overrides DebugLevel (0-5).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=5))]
    level: Option<u8>,

    /// Overrides LogFile.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Panic inside the crash guard after logging.
    #[arg(long)]
    crash: bool,
}

fn settings(cli: &Cli) -> Result<LogSettings, String> {
    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::empty(),
    };
    let mut settings = LogSettings::from_config(&config).map_err(|e| e.to_string())?;

    if let Some(kind) = cli.log_type {
        settings.kind = kind;
    }
    if let Some(level) = cli.level {
        settings.level = Severity::try_from(level).map_err(|e| e.to_string())?;
    }
    if let Some(file) = &cli.file {
        settings.file.clone_from(file);
    }
    Ok(settings)
}

fn main() {
    let cli = Cli::parse();

    let settings = match settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("agent_log: {e}");
            process::exit(2);
        }
    };

    let logger = log::global();
    if let Err(e) = logger.open_from_settings(&settings) {
        eprintln!("agent_log: cannot open log: {e}");
        process::exit(1);
    }

    log::with_crash_reporting(logger, || {
        logger_info!(logger, "starting, threshold {}", logger.threshold());
        logger_critical!(logger, "critical record");
        logger_error!(logger, "error record");
        logger_warn!(logger, "warning record");
        logger_debug!(logger, "debug record");
        logger_trace!(logger, "trace record");

        if cli.crash {
            panic!("requested crash");
        }
    });
}
