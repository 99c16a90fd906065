//! Process-wide logging bootstrap.
//!
//! One console sink (colored, human-oriented) and one daily-rotating file
//! sink under the configured log directory. The base level comes from the
//! deployment tag: `local` environments log at trace, everything else at
//! info, with chatty infrastructure crates pinned to warn. `RUST_LOG` always
//! wins over the computed default.

use crate::config::Config;
use crate::error::BootstrapError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "herald.log";

/// Keeps the non-blocking file writer flushing in the background.
///
/// Hold this in `main` for the process lifetime; dropping it flushes and
/// stops the writer thread.
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Initialize the global tracing subscriber.
///
/// Fatal on failure: a bot that cannot log is not worth starting, and a
/// second initialization in the same process is a bootstrap ordering bug.
pub fn init(config: &Config, ansi: bool) -> Result<LogGuard, BootstrapError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|e| {
        BootstrapError::Logging(format!(
            "create log directory {}: {e}",
            config.log_dir.display()
        ))
    })?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(ansi).with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| BootstrapError::Logging(e.to_string()))?;

    Ok(LogGuard { _worker: guard })
}

/// Filter directives applied when `RUST_LOG` is not set.
fn default_directives(config: &Config) -> String {
    let base = match &config.log_level {
        Some(level) => level.to_ascii_lowercase(),
        None if config.debug_mode() => "trace".to_string(),
        None => "info".to_string(),
    };
    // Infrastructure crates stay at warn so trace mode remains readable.
    format!("{base},hyper=warn,tokio_util=warn")
}
