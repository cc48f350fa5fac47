//! Logging setup for FlightGlobe.
//!
//! Structured `tracing` output goes to a log file that is cleared at session
//! start, and optionally to stderr as well. Stdout is left to command output.
//! Filtering follows `RUST_LOG`, falling back to `info` (or `debug` when
//! verbose).

use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Where and how much to log.
#[derive(Debug, Clone, Copy)]
pub struct LoggingOptions<'a> {
    /// Log file path. Its directory is created if missing.
    pub file: &'a Path,
    /// Mirror events to stderr, coloured only when stderr is a terminal.
    pub console: bool,
    /// Default to `debug` instead of `info` when `RUST_LOG` is unset.
    pub verbose: bool,
}

/// Initialize the global subscriber.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(options: LoggingOptions<'_>) -> Result<LoggingGuard, io::Error> {
    let (log_dir, log_file) = split_log_path(options.file)?;
    fs::create_dir_all(log_dir)?;

    // Start each session with an empty log
    fs::write(options.file, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let console_layer = options.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .compact()
    });

    tracing_subscriber::registry()
        .with(default_filter(options.verbose))
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn default_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn split_log_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr), io::Error> {
    let file = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path has no file name: {}", path.display()),
        )
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, file))
}
