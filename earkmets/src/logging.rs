//! Log subscriber setup for binaries using the library.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! left to the application. [`init_logging`] installs a stderr layer and,
//! when a log file is configured, a non-blocking file layer. `RUST_LOG`
//! overrides the configured verbosity.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Errors installing the log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be opened for appending.
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },

    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Logging options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// 0 = info, 1 = debug, 2 or more = trace.
    pub verbosity: u8,

    /// Also append plain-text logs to this file.
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    /// Default filter directive for the configured verbosity.
    pub fn default_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file layer when dropped and must be kept
/// alive for the lifetime of the program.
///
/// # Errors
///
/// Returns [`LoggingError`] if the log file cannot be opened or a subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));
    let stderr_layer = fmt::layer().with_target(false).with_writer(io::stderr);

    let Some(path) = &config.log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggingError::LogFile {
            path: path.clone(),
            source: e,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;
    Ok(Some(guard))
}
